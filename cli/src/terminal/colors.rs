use colored::Color;

pub const PRIMARY: Color = Color::TrueColor { r: 95, g: 215, b: 175 };
pub const ACCENT: Color = Color::TrueColor { r: 255, g: 215, b: 95 };
pub const SEPARATOR: Color = Color::BrightBlack;
pub const TEXT_DEFAULT: Color = Color::White;
