//! `show interfaces status | include connected`

/// Port identifiers, one per row: the first token of each line that does
/// not start with whitespace.
pub fn connected_ports(output: &str) -> Vec<String> {
    output
        .lines()
        .filter(|line| !line.starts_with(char::is_whitespace))
        .filter_map(|line| line.split_whitespace().next())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connected_ports_should_take_first_token() {
        let output = "\
Gi1/0/1   AP-2F-east         connected    912        a-full a-1000 10/100/1000BaseTX
Gi1/0/41  912_SKUD           connected    trunk      a-full a-1000 10/100/1000BaseTX
";
        assert_eq!(connected_ports(output), vec!["Gi1/0/1", "Gi1/0/41"]);
    }

    #[test]
    fn connected_ports_should_skip_blank_and_indented_lines() {
        let output = "\nGi1/0/2   connected  1\n   continuation\n";
        assert_eq!(connected_ports(output), vec!["Gi1/0/2"]);
    }
}
