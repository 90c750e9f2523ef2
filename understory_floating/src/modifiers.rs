// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Modifier pipeline configuration.
//!
//! Callers describe engine modifiers (`offset`, `flip`, `preventOverflow`, ...) by name with
//! free-form parameters. Before an engine instance is created the controller merges in its
//! own entries:
//!
//! - [`APPLY_STYLE`] is disabled, since styles are applied by the render layer.
//! - [`UPDATE_STATE`] reports each computed snapshot back to the controller.
//! - [`ARROW`] binds the registered arrow node, if there is one.
//!
//! Injected entries always override caller entries of the same name.

use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;

use crate::engine::Epoch;

/// Name of the engine's own style-application stage.
pub const APPLY_STYLE: &str = "applyStyle";
/// Name of the terminal stage that reports geometry to the controller.
pub const UPDATE_STATE: &str = "updateState";
/// Name of the arrow positioning stage.
pub const ARROW: &str = "arrow";

/// Pipeline order of the [`UPDATE_STATE`] stage. Runs after the engine's built-in stages.
pub const UPDATE_STATE_ORDER: u32 = 900;

/// A free-form modifier parameter.
#[derive(Clone, Debug, PartialEq)]
pub enum ParamValue {
    /// Boolean flag.
    Bool(bool),
    /// Numeric value.
    Number(f64),
    /// Text, e.g. `"viewport"` or `"0, 10"`.
    Text(String),
    /// List of values, e.g. flip behaviors.
    List(Vec<Self>),
}

/// Caller configuration for one modifier.
#[derive(Clone, Debug, PartialEq)]
pub struct ModifierConfig {
    /// Whether the stage runs.
    pub enabled: bool,
    /// Optional position in the pipeline; `None` keeps the engine default.
    pub order: Option<u32>,
    /// Stage-specific parameters.
    pub params: HashMap<String, ParamValue>,
}

impl Default for ModifierConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            order: None,
            params: HashMap::new(),
        }
    }
}

impl ModifierConfig {
    /// A configuration that turns the stage off.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Adds a parameter.
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: ParamValue) -> Self {
        self.params.insert(name.into(), value);
        self
    }
}

/// Caller-supplied modifiers, keyed by stage name.
pub type Modifiers = HashMap<String, ModifierConfig>;

/// One entry of the merged pipeline handed to the engine.
#[derive(Clone, Debug, PartialEq)]
pub enum ModifierEntry<N> {
    /// Caller or controller configuration passed through as-is.
    Config(ModifierConfig),
    /// Arrow stage bound to the registered arrow node.
    Arrow {
        /// Arrow node to position.
        element: N,
    },
    /// Terminal stage: the engine must hand every computed snapshot to
    /// [`Popper::report_geometry`](crate::Popper::report_geometry) with this epoch and
    /// continue its pipeline with the returned snapshot.
    UpdateState {
        /// Pipeline order.
        order: u32,
        /// Epoch of the instance this pipeline belongs to.
        epoch: Epoch,
    },
}

/// The merged pipeline, keyed by stage name.
pub type ModifierSet<N> = HashMap<String, ModifierEntry<N>>;

/// Merges caller modifiers with the controller's injected stages.
///
/// Caller entries go in first; [`APPLY_STYLE`], [`UPDATE_STATE`], and (if `arrow` is set)
/// [`ARROW`] are written afterwards so they win over caller entries with the same name.
#[must_use]
pub fn merge_modifiers<N: Clone>(
    caller: &Modifiers,
    epoch: Epoch,
    arrow: Option<&N>,
) -> ModifierSet<N> {
    let mut merged: ModifierSet<N> = caller
        .iter()
        .map(|(name, config)| (name.clone(), ModifierEntry::Config(config.clone())))
        .collect();
    merged.insert(
        APPLY_STYLE.into(),
        ModifierEntry::Config(ModifierConfig::disabled()),
    );
    merged.insert(
        UPDATE_STATE.into(),
        ModifierEntry::UpdateState {
            order: UPDATE_STATE_ORDER,
            epoch,
        },
    );
    if let Some(node) = arrow {
        merged.insert(
            ARROW.into(),
            ModifierEntry::Arrow {
                element: node.clone(),
            },
        );
    }
    merged
}
