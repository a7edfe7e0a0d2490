//! Text lookup used for labels.

/// Resolves translation keys to display text.
pub trait Translator {
    fn t(&self, key: &str) -> String;
}

/// Built-in English strings. Unknown keys are returned unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishText;

impl Translator for EnglishText {
    fn t(&self, key: &str) -> String {
        let text = match key {
            "pending" => "pending",
            "lowest" => "Lowest",
            "low" => "Low",
            "medium" => "Medium",
            "high" => "High",
            "highest" => "Highest",
            "collective" => "Collective",
            "round_robin" => "Round Robin",
            "managed" => "Managed",
            "fixed_hosts" => "Fixed hosts",
            "round_robin_hosts" => "Round-robin hosts",
            "assign_to" => "Assign to",
            "add_attendees" => "Add attendees",
            "automatically_add_all_team_members" => "Add all team members, including future members",
            other => other,
        };
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_and_unknown_keys() {
        assert_eq!(EnglishText.t("highest"), "Highest");
        assert_eq!(EnglishText.t("not_a_key"), "not_a_key");
    }
}
