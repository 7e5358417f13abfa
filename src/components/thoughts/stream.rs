use crate::content::{ThoughtChain, ThoughtNode};

/// What a reveal tick did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThoughtStep {
	/// Another node became visible.
	Revealed,
	/// Every node was already visible; the chain now lingers before hiding.
	Lingering,
	/// No chain is being revealed.
	Idle,
}

#[derive(Clone, Debug, PartialEq)]
struct ActiveChain {
	index: usize,
	shown: usize,
	lingering: bool,
}

/// A panel that occasionally thinks out loud, one reasoning step at a time.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ThoughtStream {
	chains: Vec<ThoughtChain>,
	active: Option<ActiveChain>,
	expanded: bool,
}

impl ThoughtStream {
	/// Chains without nodes are dropped.
	pub fn new(chains: Vec<ThoughtChain>) -> Self {
		Self {
			chains: chains.into_iter().filter(|c| !c.nodes.is_empty()).collect(),
			active: None,
			expanded: false,
		}
	}

	pub fn is_active(&self) -> bool {
		self.active.is_some()
	}

	pub fn is_expanded(&self) -> bool {
		self.expanded
	}

	pub fn is_lingering(&self) -> bool {
		self.active.as_ref().is_some_and(|a| a.lingering)
	}

	fn chain(&self) -> Option<(&ThoughtChain, &ActiveChain)> {
		let active = self.active.as_ref()?;
		Some((self.chains.get(active.index)?, active))
	}

	pub fn topic(&self) -> Option<&str> {
		self.chain().map(|(c, _)| c.topic.as_str())
	}

	pub fn visible_nodes(&self) -> &[ThoughtNode] {
		match self.chain() {
			Some((chain, active)) => &chain.nodes[..active.shown],
			None => &[],
		}
	}

	/// More nodes are still to come.
	pub fn has_more(&self) -> bool {
		self.chain()
			.is_some_and(|(chain, active)| active.shown < chain.nodes.len())
	}

	/// Show the first node of chain `pick` (wrapped into range). Ignored
	/// while another chain is active or when there is nothing to show.
	pub fn start(&mut self, pick: usize) -> bool {
		if self.active.is_some() || self.chains.is_empty() {
			return false;
		}
		self.active = Some(ActiveChain {
			index: pick % self.chains.len(),
			shown: 1,
			lingering: false,
		});
		true
	}

	/// Periodic chance to start thinking: starts when `roll < chance`.
	pub fn roll(&mut self, roll: f64, chance: f64, pick: usize) -> bool {
		roll < chance && self.start(pick)
	}

	pub fn step(&mut self) -> ThoughtStep {
		let len = match self.chain() {
			Some((chain, active)) if !active.lingering => chain.nodes.len(),
			_ => return ThoughtStep::Idle,
		};
		let Some(active) = self.active.as_mut() else {
			return ThoughtStep::Idle;
		};
		if active.shown < len {
			active.shown += 1;
			ThoughtStep::Revealed
		} else {
			active.lingering = true;
			ThoughtStep::Lingering
		}
	}

	/// The linger ran out: hide the chain.
	pub fn expire(&mut self) {
		if self.is_lingering() {
			self.active = None;
		}
	}

	/// Hide immediately and collapse.
	pub fn close(&mut self) {
		self.active = None;
		self.expanded = false;
	}

	pub fn toggle_expanded(&mut self) {
		self.expanded = !self.expanded;
	}
}
