/// Character-by-character reveal of a fixed string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Typewriter {
	text: String,
	/// Byte offset of the end of the visible prefix, always on a char boundary.
	shown: usize,
}

impl Typewriter {
	pub fn new(text: impl Into<String>) -> Self {
		Self {
			text: text.into(),
			shown: 0,
		}
	}

	/// Show one more character. Returns false once everything is visible.
	pub fn step(&mut self) -> bool {
		match self.text[self.shown..].chars().next() {
			Some(c) => {
				self.shown += c.len_utf8();
				true
			}
			None => false,
		}
	}

	pub fn visible(&self) -> &str {
		&self.text[..self.shown]
	}

	pub fn into_full(self) -> String {
		self.text
	}

	pub fn is_complete(&self) -> bool {
		self.shown == self.text.len()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn reveals_one_char_per_step() {
		let mut t = Typewriter::new("héllo");
		let mut seen = vec![t.visible().to_string()];
		while t.step() {
			seen.push(t.visible().to_string());
		}
		assert_eq!(seen, ["", "h", "hé", "hél", "héll", "héllo"]);
		assert!(t.is_complete());
		assert!(!t.step());
		assert_eq!(t.into_full(), "héllo");
	}

	#[test]
	fn empty_text_is_complete_immediately() {
		let mut t = Typewriter::new("");
		assert!(t.is_complete());
		assert!(!t.step());
	}
}
