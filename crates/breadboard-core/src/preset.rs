//! The editor's saved-circuit document.
//!
//! A preset carries the full schematic: component records with layout
//! attributes (position, rotation, label) and wires keyed by display id.
//! Only the electrical content matters here; serde drops the layout fields
//! the engines never look at.

use serde::Deserialize;

use crate::component::{Component, ComponentKind, PortKey, WaveformKind, Wire};
use crate::error::{Error, Result};
use crate::units;

/// A parsed preset document.
#[derive(Debug, Clone, Deserialize)]
pub struct Preset {
    #[serde(default)]
    components: Vec<PresetComponent>,
    #[serde(default)]
    wires: Vec<PresetWire>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PresetComponent {
    id: String,
    #[serde(rename = "type")]
    kind: ComponentKind,
    #[serde(default)]
    value: Option<ValueSpec>,
    #[serde(default)]
    frequency: Option<f64>,
    #[serde(default)]
    waveform: Option<WaveformKind>,
    #[serde(default)]
    dc_bias: Option<f64>,
    #[serde(default)]
    duty_cycle: Option<f64>,
    #[serde(default)]
    input_impedance: Option<f64>,
    #[serde(default)]
    input_count: Option<usize>,
    #[serde(default)]
    max_current: Option<f64>,
}

/// Component values are stored as numbers or SI-suffixed strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum ValueSpec {
    Number(f64),
    Text(String),
}

impl ValueSpec {
    fn resolve(&self) -> Option<f64> {
        match self {
            ValueSpec::Number(v) => Some(*v),
            ValueSpec::Text(s) => units::parse_value(s),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PresetWire {
    from: PresetPort,
    to: PresetPort,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PresetPort {
    component_id: String,
    port_index: usize,
}

impl Preset {
    /// Lower the document into the engines' circuit description.
    pub fn into_circuit(self) -> Result<(Vec<Component>, Vec<Wire>)> {
        let mut components = Vec::with_capacity(self.components.len());
        for pc in self.components {
            let value = match &pc.value {
                None => 0.0,
                Some(raw) => raw.resolve().ok_or_else(|| Error::BadValue {
                    id: pc.id.clone(),
                    value: match raw {
                        ValueSpec::Number(v) => v.to_string(),
                        ValueSpec::Text(s) => s.clone(),
                    },
                })?,
            };
            components.push(Component {
                id: pc.id,
                kind: pc.kind,
                value,
                frequency: pc.frequency,
                waveform: pc.waveform,
                dc_bias: pc.dc_bias,
                duty_cycle: pc.duty_cycle,
                input_impedance: pc.input_impedance,
                input_count: pc.input_count,
                max_current: pc.max_current,
            });
        }

        let wires = self
            .wires
            .into_iter()
            .map(|w| {
                Wire::new(
                    PortKey::new(w.from.component_id, w.from.port_index),
                    PortKey::new(w.to.component_id, w.to.port_index),
                )
            })
            .collect();

        Ok((components, wires))
    }
}

/// Parse a preset JSON document into components and wires.
pub fn parse_preset(json: &str) -> Result<(Vec<Component>, Vec<Wire>)> {
    let preset: Preset =
        serde_json::from_str(json).map_err(|e| Error::InvalidPreset(e.to_string()))?;
    preset.into_circuit()
}
