/// Strip markdown code blocks from a response.
pub fn strip_code_blocks(response: &str) -> &str {
    response
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_json_fence() {
        assert_eq!(strip_code_blocks("```json\n{}\n```"), "{}");
    }

    #[test]
    fn strips_bare_fence() {
        assert_eq!(strip_code_blocks("```\n{}\n```"), "{}");
    }

    #[test]
    fn passes_unfenced_through() {
        assert_eq!(strip_code_blocks("{\"a\": true}"), "{\"a\": true}");
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(strip_code_blocks("  \n{}\n  "), "{}");
    }
}
