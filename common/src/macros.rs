/// Emits a success line. Rendered with its own marker by the terminal formatter.
#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        $crate::tracing::info!(target: "portinspector::success", $($arg)*)
    };
}
