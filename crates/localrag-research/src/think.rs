/// Record a reflection between searches. Always succeeds.
pub fn think(note: &str) -> String {
    tracing::info!(target: "localrag::think", note, "reflection");
    format!("Reflection recorded: {}", note)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acknowledges_note() {
        assert_eq!(think("two sources agree"), "Reflection recorded: two sources agree");
        assert_eq!(think(""), "Reflection recorded: ");
    }
}
