//! Circuit description supplied by the schematic editor.
//!
//! A circuit is a flat list of [`Component`] records plus a list of [`Wire`]s
//! joining component ports. The description is immutable for the duration of
//! a solve; the editor mutates its own copy and asks for a fresh solve.

use serde::{Deserialize, Serialize};

/// Kinds of components the editor can place.
///
/// Serde names match the editor's `type` strings (`"RESISTOR"`,
/// `"AC_SOURCE"`, `"NOT_GATE"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComponentKind {
    Resistor,
    Capacitor,
    Inductor,
    VoltageSource,
    AcSource,
    Diode,
    Led,
    Voltmeter,
    Ammeter,
    Ground,
    Opamp,
    NotGate,
    AndGate,
    OrGate,
    NandGate,
    NorGate,
    XorGate,
}

impl ComponentKind {
    /// Number of ports for this kind, given the normalized gate input count.
    ///
    /// Multi-input gates expose `input_count` input ports (0..n-1) plus one
    /// output port at index n. The op-amp is non-inverting input, inverting
    /// input, output. Everything else is a two-terminal element except
    /// ground, which has a single terminal.
    pub fn port_count(self, input_count: usize) -> usize {
        match self {
            ComponentKind::Ground => 1,
            ComponentKind::Opamp => 3,
            ComponentKind::AndGate
            | ComponentKind::OrGate
            | ComponentKind::NandGate
            | ComponentKind::NorGate
            | ComponentKind::XorGate => input_count + 1,
            _ => 2,
        }
    }

    /// True for logic gates, including the single-input NOT gate.
    pub fn is_gate(self) -> bool {
        matches!(
            self,
            ComponentKind::NotGate
                | ComponentKind::AndGate
                | ComponentKind::OrGate
                | ComponentKind::NandGate
                | ComponentKind::NorGate
                | ComponentKind::XorGate
        )
    }

    /// True for independent sources (DC and AC).
    pub fn is_source(self) -> bool {
        matches!(self, ComponentKind::VoltageSource | ComponentKind::AcSource)
    }
}

/// Waveform shapes an AC source can produce in transient analysis.
///
/// Deserialization falls back to `Sine` for unrecognized names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WaveformKind {
    #[default]
    Sine,
    Square,
    Triangle,
    Sawtooth,
    Pulse,
}

impl WaveformKind {
    /// Resolve an editor waveform name; anything unrecognized is a sine.
    pub fn from_name(name: &str) -> Self {
        match name {
            "SQUARE" => WaveformKind::Square,
            "TRIANGLE" => WaveformKind::Triangle,
            "SAWTOOTH" => WaveformKind::Sawtooth,
            "PULSE" => WaveformKind::Pulse,
            _ => WaveformKind::Sine,
        }
    }
}

impl<'de> Deserialize<'de> for WaveformKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Ok(WaveformKind::from_name(&name))
    }
}

/// One placed component.
///
/// `value` is kind-dependent: resistance in ohms, capacitance in farads,
/// inductance in henries, source voltage in volts, open-loop gain for
/// op-amps, forward voltage for diodes and LEDs, logic-high voltage for
/// gates. The optional attributes only apply to some kinds and default in
/// the device models when absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    pub id: String,
    pub kind: ComponentKind,
    #[serde(default)]
    pub value: f64,
    /// Source frequency in Hz.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<f64>,
    /// Transient waveform shape for AC sources.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waveform: Option<WaveformKind>,
    /// DC offset of an AC source, in volts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dc_bias: Option<f64>,
    /// Duty cycle in (0, 1) for square and pulse waveforms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duty_cycle: Option<f64>,
    /// Op-amp differential input impedance in ohms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_impedance: Option<f64>,
    /// Number of gate inputs (at least 2).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_count: Option<usize>,
    /// Rated maximum current in amperes (LEDs).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_current: Option<f64>,
}

impl Component {
    /// Create a component with no optional attributes set.
    pub fn new(id: impl Into<String>, kind: ComponentKind, value: f64) -> Self {
        Self {
            id: id.into(),
            kind,
            value,
            frequency: None,
            waveform: None,
            dc_bias: None,
            duty_cycle: None,
            input_impedance: None,
            input_count: None,
            max_current: None,
        }
    }

    pub fn with_frequency(mut self, hz: f64) -> Self {
        self.frequency = Some(hz);
        self
    }

    pub fn with_waveform(mut self, waveform: WaveformKind) -> Self {
        self.waveform = Some(waveform);
        self
    }

    pub fn with_dc_bias(mut self, volts: f64) -> Self {
        self.dc_bias = Some(volts);
        self
    }

    pub fn with_duty_cycle(mut self, duty: f64) -> Self {
        self.duty_cycle = Some(duty);
        self
    }

    pub fn with_input_impedance(mut self, ohms: f64) -> Self {
        self.input_impedance = Some(ohms);
        self
    }

    pub fn with_input_count(mut self, inputs: usize) -> Self {
        self.input_count = Some(inputs);
        self
    }

    pub fn with_max_current(mut self, amps: f64) -> Self {
        self.max_current = Some(amps);
        self
    }

    /// Gate input count, normalized to at least 2.
    pub fn gate_inputs(&self) -> usize {
        self.input_count.unwrap_or(2).max(2)
    }

    /// Number of ports this component exposes.
    pub fn port_count(&self) -> usize {
        self.kind.port_count(self.gate_inputs())
    }
}

/// A component terminal, addressed by owning component and port index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortKey {
    pub component: String,
    pub port: usize,
}

impl PortKey {
    pub fn new(component: impl Into<String>, port: usize) -> Self {
        Self {
            component: component.into(),
            port,
        }
    }
}

/// A point-to-point connection between two ports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wire {
    pub from: PortKey,
    pub to: PortKey,
}

impl Wire {
    pub fn new(from: PortKey, to: PortKey) -> Self {
        Self { from, to }
    }

    /// Connect `(component, port)` pairs directly.
    pub fn between(a: (&str, usize), b: (&str, usize)) -> Self {
        Self {
            from: PortKey::new(a.0, a.1),
            to: PortKey::new(b.0, b.1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_counts() {
        assert_eq!(Component::new("g", ComponentKind::Ground, 0.0).port_count(), 1);
        assert_eq!(Component::new("r", ComponentKind::Resistor, 1e3).port_count(), 2);
        assert_eq!(Component::new("u", ComponentKind::Opamp, 1e5).port_count(), 3);
        assert_eq!(Component::new("n", ComponentKind::NotGate, 5.0).port_count(), 2);

        let and3 = Component::new("a", ComponentKind::AndGate, 5.0).with_input_count(3);
        assert_eq!(and3.port_count(), 4);

        // Undersized input counts are pulled up to two.
        let and1 = Component::new("a", ComponentKind::AndGate, 5.0).with_input_count(1);
        assert_eq!(and1.port_count(), 3);
    }

    #[test]
    fn test_kind_names_roundtrip() {
        let json = serde_json::to_string(&ComponentKind::AcSource).unwrap();
        assert_eq!(json, "\"AC_SOURCE\"");
        let kind: ComponentKind = serde_json::from_str("\"NOT_GATE\"").unwrap();
        assert_eq!(kind, ComponentKind::NotGate);
    }

    #[test]
    fn test_unknown_waveform_is_sine() {
        let w: WaveformKind = serde_json::from_str("\"WOBBLE\"").unwrap();
        assert_eq!(w, WaveformKind::Sine);
        let w: WaveformKind = serde_json::from_str("\"SAWTOOTH\"").unwrap();
        assert_eq!(w, WaveformKind::Sawtooth);
    }

    #[test]
    fn test_component_json_shape() {
        let c = Component::new("v1", ComponentKind::AcSource, 1.0)
            .with_frequency(50.0)
            .with_dc_bias(2.5);
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["kind"], "AC_SOURCE");
        assert_eq!(json["dcBias"], 2.5);
        assert!(json.get("dutyCycle").is_none());
    }
}
