//! Static site content, embedded at build time from `content/site.toml`.

use serde::Deserialize;
use thiserror::Error;

use crate::components::chat::{ChatTiming, ResponseRule, ResponseTable};

const SITE_TOML: &str = include_str!("../content/site.toml");

#[derive(Debug, Error)]
pub enum ContentError {
	#[error("site content is not valid TOML: {0}")]
	Parse(#[from] toml::de::Error),
	#[error("{script} rule {index} has no usable trigger")]
	EmptyTrigger { script: &'static str, index: usize },
	#[error("{script} thinking delay {min_ms}..{max_ms}ms is inverted")]
	InvalidDelay {
		script: &'static str,
		min_ms: u32,
		max_ms: u32,
	},
	#[error("{script} fallback response is empty")]
	EmptyFallback { script: &'static str },
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct SiteContent {
	pub assistant: ChatScript,
	pub ask: ChatScript,
	#[serde(default)]
	pub thoughts: Vec<ThoughtChain>,
	#[serde(default)]
	pub hero: HeroContent,
	#[serde(default)]
	pub neural_labels: Vec<String>,
}

/// Everything one chat widget needs: what it says and how fast.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ChatScript {
	pub title: String,
	#[serde(default)]
	pub greeting: Option<String>,
	/// Greetings keyed by visitor interest, first match wins.
	#[serde(default)]
	pub greetings: Vec<Greeting>,
	pub fallback: String,
	pub think_min_ms: u32,
	pub think_max_ms: u32,
	#[serde(default = "default_reveal_ms")]
	pub reveal_ms: u32,
	#[serde(default)]
	pub rules: Vec<RuleEntry>,
}

fn default_reveal_ms() -> u32 {
	15
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Greeting {
	pub interest: String,
	pub text: String,
}

/// A canned answer. `question` doubles as a sample chip and a trigger.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct RuleEntry {
	#[serde(default)]
	pub question: Option<String>,
	#[serde(default)]
	pub triggers: Vec<String>,
	pub response: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ThoughtChain {
	pub topic: String,
	pub nodes: Vec<ThoughtNode>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ThoughtNode {
	pub kind: ThoughtKind,
	pub content: String,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ThoughtKind {
	Premise,
	Reasoning,
	Question,
	Insight,
	Conclusion,
}

impl ThoughtKind {
	pub fn label(self) -> &'static str {
		match self {
			ThoughtKind::Premise => "Premise",
			ThoughtKind::Reasoning => "Reasoning",
			ThoughtKind::Question => "Question",
			ThoughtKind::Insight => "Insight",
			ThoughtKind::Conclusion => "Conclusion",
		}
	}
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct HeroContent {
	pub title: String,
	#[serde(default)]
	pub taglines: Vec<String>,
}

impl SiteContent {
	/// Parse and validate the embedded content.
	pub fn load() -> Result<Self, ContentError> {
		Self::parse(SITE_TOML)
	}

	pub fn parse(text: &str) -> Result<Self, ContentError> {
		let content: SiteContent = toml::from_str(text)?;
		content.assistant.validate("assistant")?;
		content.ask.validate("ask")?;
		Ok(content)
	}
}

impl Default for SiteContent {
	fn default() -> Self {
		let script = |title: &str, min_ms, max_ms| ChatScript {
			title: title.to_string(),
			greeting: None,
			greetings: Vec::new(),
			fallback: "I'm not able to answer right now. Please try again later.".to_string(),
			think_min_ms: min_ms,
			think_max_ms: max_ms,
			reveal_ms: default_reveal_ms(),
			rules: Vec::new(),
		};
		Self {
			assistant: script("Assistant", 1000, 1000),
			ask: script("Ask", 500, 1500),
			thoughts: Vec::new(),
			hero: HeroContent::default(),
			neural_labels: Vec::new(),
		}
	}
}

impl ChatScript {
	fn validate(&self, script: &'static str) -> Result<(), ContentError> {
		if self.fallback.trim().is_empty() {
			return Err(ContentError::EmptyFallback { script });
		}
		if self.think_min_ms > self.think_max_ms {
			return Err(ContentError::InvalidDelay {
				script,
				min_ms: self.think_min_ms,
				max_ms: self.think_max_ms,
			});
		}
		for (index, rule) in self.rules.iter().enumerate() {
			if rule_of(rule).is_empty() {
				return Err(ContentError::EmptyTrigger { script, index });
			}
		}
		Ok(())
	}

	pub fn table(&self) -> ResponseTable {
		ResponseTable::new(self.rules.iter().map(rule_of).collect(), self.fallback.clone())
	}

	pub fn timing(&self) -> ChatTiming {
		ChatTiming {
			think_min_ms: self.think_min_ms,
			think_max_ms: self.think_max_ms,
			reveal_ms: self.reveal_ms,
		}
	}

	/// Questions to offer as one-click samples.
	pub fn samples(&self) -> Vec<String> {
		self.rules.iter().filter_map(|r| r.question.clone()).collect()
	}

	/// Greeting for the first configured interest the visitor declared,
	/// else the default greeting.
	pub fn greeting_for(&self, interests: &[String]) -> Option<&str> {
		self.greetings
			.iter()
			.find(|g| interests.iter().any(|i| i.eq_ignore_ascii_case(&g.interest)))
			.map(|g| g.text.as_str())
			.or(self.greeting.as_deref())
	}
}

fn rule_of(entry: &RuleEntry) -> ResponseRule {
	let triggers = entry.question.iter().chain(entry.triggers.iter());
	ResponseRule::new(triggers, entry.response.clone())
}

/// Comma-separated interests, as passed in the `interests` query parameter.
pub fn parse_interests(raw: &str) -> Vec<String> {
	raw.split(',')
		.map(str::trim)
		.filter(|s| !s.is_empty())
		.map(str::to_string)
		.collect()
}
