//! Handle bindings for the hips and each leg's IK target/hint.
//!
//! Handles are opaque to the core (`H` is an `Entity` in Bevy, a string or an
//! index in tests). Only the leg count flows into the per-frame state.

use serde::{Deserialize, Serialize};

use crate::error::{SetupError, SetupResult};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LegBinding<H> {
    pub target: Option<H>,
    pub hint: Option<H>,
}

/// Unvalidated description of the rig as authored by the host.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RigBinding<H> {
    pub hips: Option<H>,
    #[serde(default = "Vec::new")]
    pub legs: Vec<LegBinding<H>>,
}

impl<H> Default for RigBinding<H> {
    fn default() -> Self {
        Self {
            hips: None,
            legs: Vec::new(),
        }
    }
}

impl<H> RigBinding<H> {
    pub fn new(hips: H) -> Self {
        Self {
            hips: Some(hips),
            legs: Vec::new(),
        }
    }

    /// Append a fully bound leg. Leg order defines sweep order.
    pub fn with_leg(mut self, target: H, hint: H) -> Self {
        self.legs.push(LegBinding {
            target: Some(target),
            hint: Some(hint),
        });
        self
    }

    pub fn leg_count(&self) -> usize {
        self.legs.len()
    }

    /// Drop handles rejected by `keep` (e.g. entities that no longer exist),
    /// turning them into missing bindings for validation.
    pub fn retain_handles(self, keep: impl Fn(&H) -> bool) -> Self {
        let filter = |h: Option<H>| h.filter(|h| keep(h));
        Self {
            hips: filter(self.hips),
            legs: self
                .legs
                .into_iter()
                .map(|leg| LegBinding {
                    target: filter(leg.target),
                    hint: filter(leg.hint),
                })
                .collect(),
        }
    }

    /// Validate in a fixed order: hips, leg count, then each leg's target and hint.
    pub fn bind(self) -> SetupResult<BoundRig<H>> {
        let hips = self.hips.ok_or(SetupError::MissingHips)?;
        if self.legs.is_empty() {
            return Err(SetupError::NoLegs);
        }
        let legs = self
            .legs
            .into_iter()
            .enumerate()
            .map(|(leg, binding)| {
                let target = binding.target.ok_or(SetupError::MissingTarget { leg })?;
                let hint = binding.hint.ok_or(SetupError::MissingHint { leg })?;
                Ok(BoundLeg { target, hint })
            })
            .collect::<SetupResult<Vec<_>>>()?;
        Ok(BoundRig { hips, legs })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundLeg<H> {
    pub target: H,
    pub hint: H,
}

/// A validated rig; the leg array length is fixed from here on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundRig<H> {
    pub hips: H,
    pub legs: Vec<BoundLeg<H>>,
}

impl<H> BoundRig<H> {
    pub fn leg_count(&self) -> usize {
        self.legs.len()
    }
}
