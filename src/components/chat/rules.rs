//! Canned response lookup.
//!
//! Inputs and triggers are compared as lowercase words, ignoring punctuation
//! and spacing. A trigger must start at a word boundary but its last word may
//! run on, so "workout" fires for "workouts" while "ai" stays quiet inside
//! "failure".

/// Lowercase alphanumeric words of `text`, each preceded by one space.
fn normalize(text: &str) -> String {
	let mut out = String::with_capacity(text.len() + 1);
	for word in text.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty()) {
		out.push(' ');
		out.extend(word.chars().flat_map(char::to_lowercase));
	}
	out
}

/// One rule: any of its trigger phrases selects its response.
#[derive(Clone, Debug, PartialEq)]
pub struct ResponseRule {
	/// Normalized, so each starts with a space.
	triggers: Vec<String>,
	response: String,
}

impl ResponseRule {
	pub fn new<I, S>(triggers: I, response: impl Into<String>) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		Self {
			triggers: triggers
				.into_iter()
				.map(|t| normalize(t.as_ref()))
				.filter(|t| !t.is_empty())
				.collect(),
			response: response.into(),
		}
	}

	/// A rule with no usable trigger can never fire.
	pub fn is_empty(&self) -> bool {
		self.triggers.is_empty()
	}

	fn matches(&self, input: &str) -> bool {
		self.triggers.iter().any(|t| input.contains(t.as_str()))
	}
}

/// Ordered rules evaluated top-down, ending in a mandatory fallback.
#[derive(Clone, Debug, PartialEq)]
pub struct ResponseTable {
	rules: Vec<ResponseRule>,
	fallback: String,
}

impl ResponseTable {
	pub fn new(rules: Vec<ResponseRule>, fallback: impl Into<String>) -> Self {
		Self {
			rules,
			fallback: fallback.into(),
		}
	}

	#[cfg(test)]
	pub(crate) fn is_empty(&self) -> bool {
		self.rules.is_empty()
	}

	/// First matching rule's response, else the fallback. Never fails.
	pub fn respond(&self, input: &str) -> &str {
		let input = normalize(input);
		self.rules
			.iter()
			.find(|r| r.matches(&input))
			.map(|r| r.response.as_str())
			.unwrap_or(&self.fallback)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn table() -> ResponseTable {
		ResponseTable::new(
			vec![
				ResponseRule::new(["What's your approach to building AI products?"], "approach"),
				ResponseRule::new(["What's your philosophy on failure?", "failure"], "failure"),
				ResponseRule::new(["ai", "artificial intelligence"], "ai"),
			],
			"fallback",
		)
	}

	#[test]
	fn normalizes_to_spaced_lowercase_words() {
		assert_eq!(normalize("What's  your AI-plan?"), " what s your ai plan");
		assert!(normalize("  ?! ").is_empty());
	}

	#[test]
	fn full_question_matches_regardless_of_case_and_punctuation() {
		let t = table();
		assert_eq!(t.respond("What's your approach to building AI products?"), "approach");
		assert_eq!(t.respond("what's your APPROACH to building ai products"), "approach");
	}

	#[test]
	fn questions_sharing_a_prefix_do_not_collide() {
		let t = table();
		assert_eq!(t.respond("What's your philosophy on failure?"), "failure");
	}

	#[test]
	fn keywords_must_start_a_word() {
		let t = table();
		assert_eq!(t.respond("Tell me about AI"), "ai");
		assert_eq!(t.respond("thoughts on artificial   intelligence?"), "ai");
		assert_eq!(t.respond("I said hi to the mail carrier"), "fallback");
		assert_eq!(t.respond("Can you explain?"), "fallback");
	}

	#[test]
	fn keywords_match_plural_and_suffixed_forms() {
		let t = ResponseTable::new(
			vec![
				ResponseRule::new(["workout", "fitness", "gym"], "fitness"),
				ResponseRule::new(["theory of change", "framework"], "framework"),
			],
			"fallback",
		);
		assert_eq!(t.respond("How many workouts a week?"), "fitness");
		assert_eq!(t.respond("Which gyms do you like?"), "fitness");
		assert_eq!(t.respond("Which frameworks guide you?"), "framework");
		assert_eq!(t.respond("Your theory of changes?"), "framework");
		assert_eq!(t.respond("theory offline change"), "fallback");
	}

	#[test]
	fn earlier_rules_win() {
		let t = table();
		assert_eq!(t.respond("AI and failure"), "failure");
	}

	#[test]
	fn unmatched_input_falls_back() {
		let t = table();
		assert_eq!(t.respond("asdf1234"), "fallback");
		assert_eq!(ResponseTable::new(Vec::new(), "only").respond("ai"), "only");
	}

	#[test]
	fn blank_triggers_are_dropped() {
		let rule = ResponseRule::new(["", " ? "], "never");
		assert!(rule.is_empty());
		let t = ResponseTable::new(vec![rule], "fallback");
		assert_eq!(t.respond(""), "fallback");
	}
}
