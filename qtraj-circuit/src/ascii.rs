//! ASCII circuit diagrams
//!
//! One wire per qubit, qubit 0 on top, and one column per operation in log
//! order. Controls are drawn as `●`, X targets as `⊕`, swap ends as `×`,
//! measurements as `[M]` and noise channels as short labels such as
//! `[BF(0.10)]`. Qubits strictly between the ends of a multi-qubit
//! operation get a vertical `│`.
//!
//! ```text
//! q0: ──[H]──●──
//! q1: ───────⊕──
//! ```
//!
//! # Example
//!
//! ```
//! use qtraj_circuit::{ascii, AsciiConfig, Circuit, GateKind, RenderStyle};
//!
//! let mut circuit = Circuit::new(2).unwrap();
//! circuit.add(GateKind::H, &[0], None).unwrap();
//! circuit.add(GateKind::Cnot, &[0, 1], None).unwrap();
//!
//! let config = AsciiConfig::builder().style(RenderStyle::Ascii).build();
//! let text = ascii::render_with_config(&circuit, &config);
//! assert_eq!(text, "q0: --[H]---@---\nq1: -------(+)--");
//! ```

use crate::circuit::Circuit;
use crate::operation::{GateKind, Operation};

// ============================================================================
// Configuration Types
// ============================================================================

/// Character set used for drawing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderStyle {
    /// Unicode box-drawing characters
    #[default]
    Unicode,
    /// ASCII-only characters
    Ascii,
}

/// Configuration for ASCII rendering
#[derive(Debug, Clone)]
pub struct AsciiConfig {
    /// Character set
    pub style: RenderStyle,
    /// Show qubit labels (q0:, q1:, ...)
    pub show_labels: bool,
    /// Digits after the decimal point for parameters
    pub float_precision: usize,
}

impl Default for AsciiConfig {
    fn default() -> Self {
        Self {
            style: RenderStyle::Unicode,
            show_labels: true,
            float_precision: 2,
        }
    }
}

impl AsciiConfig {
    pub fn builder() -> AsciiConfigBuilder {
        AsciiConfigBuilder::default()
    }

    /// ASCII-only configuration for terminals without Unicode
    pub fn ascii_only() -> Self {
        Self {
            style: RenderStyle::Ascii,
            ..Default::default()
        }
    }

    fn wire_char(&self) -> char {
        match self.style {
            RenderStyle::Ascii => '-',
            RenderStyle::Unicode => '─',
        }
    }
}

/// Builder for [`AsciiConfig`]
#[derive(Debug, Clone, Default)]
pub struct AsciiConfigBuilder {
    config: AsciiConfig,
}

impl AsciiConfigBuilder {
    pub fn style(mut self, style: RenderStyle) -> Self {
        self.config.style = style;
        self
    }

    pub fn show_labels(mut self, show: bool) -> Self {
        self.config.show_labels = show;
        self
    }

    pub fn float_precision(mut self, precision: usize) -> Self {
        self.config.float_precision = precision;
        self
    }

    pub fn build(self) -> AsciiConfig {
        self.config
    }
}

// ============================================================================
// Symbol Definitions
// ============================================================================

struct GateSymbols {
    control: &'static str,
    target_x: &'static str,
    swap: &'static str,
    measure: &'static str,
    wire_v: &'static str,
}

impl GateSymbols {
    fn unicode() -> Self {
        Self {
            control: "●",
            target_x: "⊕",
            swap: "×",
            measure: "M",
            wire_v: "│",
        }
    }

    fn ascii() -> Self {
        Self {
            control: "@",
            target_x: "(+)",
            swap: "x",
            measure: "M",
            wire_v: "|",
        }
    }

    fn from_style(style: RenderStyle) -> Self {
        match style {
            RenderStyle::Ascii => Self::ascii(),
            RenderStyle::Unicode => Self::unicode(),
        }
    }
}

// ============================================================================
// Public API
// ============================================================================

/// Render a circuit with the default configuration
pub fn render(circuit: &Circuit) -> String {
    render_with_config(circuit, &AsciiConfig::default())
}

/// Render a circuit with a custom configuration
pub fn render_with_config(circuit: &Circuit, config: &AsciiConfig) -> String {
    AsciiRenderer::new(circuit, config).render()
}

impl Circuit {
    /// ASCII diagram with the default configuration
    pub fn to_ascii(&self) -> String {
        render(self)
    }

    pub fn to_ascii_with_config(&self, config: &AsciiConfig) -> String {
        render_with_config(self, config)
    }
}

// ============================================================================
// Core Renderer
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QubitRole {
    /// Single-qubit gate, measurement or noise channel
    Single,
    /// Control qubit of a controlled gate
    Control,
    /// Target qubit of a controlled gate
    Target,
    /// End of a SWAP
    SwapEnd,
    /// Wire passing between the ends of a multi-qubit gate
    Wire,
}

struct AsciiRenderer<'a> {
    circuit: &'a Circuit,
    config: &'a AsciiConfig,
    symbols: GateSymbols,
    label_width: usize,
}

impl<'a> AsciiRenderer<'a> {
    fn new(circuit: &'a Circuit, config: &'a AsciiConfig) -> Self {
        let label_width = if config.show_labels {
            // "q{n}: "
            3 + digit_count(circuit.num_qubits().saturating_sub(1))
        } else {
            0
        };

        Self {
            circuit,
            config,
            symbols: GateSymbols::from_style(config.style),
            label_width,
        }
    }

    fn render(&self) -> String {
        let num_qubits = self.circuit.num_qubits();
        let wire = self.config.wire_char();
        let mut lines: Vec<String> = (0..num_qubits)
            .map(|q| {
                let mut line = String::new();
                if self.config.show_labels {
                    line.push_str(&format!("{:<width$}", format!("q{}: ", q), width = self.label_width));
                }
                line.push(wire);
                line
            })
            .collect();

        for op in self.circuit.operations() {
            let cells = self.column_cells(op);
            let width = cells
                .iter()
                .flatten()
                .map(|s| display_width(s))
                .max()
                .unwrap_or(1)
                + 2;

            for (line, cell) in lines.iter_mut().zip(&cells) {
                match cell {
                    Some(s) => line.push_str(&center_with_wire(s, width, wire)),
                    None => line.extend(std::iter::repeat(wire).take(width)),
                }
            }
        }

        for line in &mut lines {
            line.push(wire);
        }
        lines.join("\n")
    }

    /// Symbol for every qubit in one column, `None` for a plain wire
    fn column_cells(&self, op: &Operation) -> Vec<Option<String>> {
        let mut cells = vec![None; self.circuit.num_qubits()];
        let qubits = op.qubits();

        for (i, &q) in qubits.iter().enumerate() {
            let role = role_for_index(op.kind(), i, qubits.len());
            cells[q] = Some(self.symbol_for(op, role));
        }

        if qubits.len() > 1 {
            let lo = qubits.iter().copied().min().unwrap_or(0);
            let hi = qubits.iter().copied().max().unwrap_or(0);
            for q in (lo + 1)..hi {
                if cells[q].is_none() {
                    cells[q] = Some(self.symbol_for(op, QubitRole::Wire));
                }
            }
        }
        cells
    }

    fn symbol_for(&self, op: &Operation, role: QubitRole) -> String {
        match role {
            QubitRole::Single => self.boxed(&self.gate_label(op)),
            QubitRole::Control => self.symbols.control.to_string(),
            QubitRole::Target => self.target_symbol(op),
            QubitRole::SwapEnd => self.symbols.swap.to_string(),
            QubitRole::Wire => self.symbols.wire_v.to_string(),
        }
    }

    fn target_symbol(&self, op: &Operation) -> String {
        match op.kind() {
            GateKind::Cnot | GateKind::Toffoli => self.symbols.target_x.to_string(),
            GateKind::Cz => self.symbols.control.to_string(),
            _ => self.boxed(&self.gate_label(op)),
        }
    }

    /// Text inside the box: base gate name plus formatted parameter
    fn gate_label(&self, op: &Operation) -> String {
        let base = match op.kind() {
            GateKind::Measure => self.symbols.measure,
            GateKind::Cy => "Y",
            GateKind::Ch => "H",
            GateKind::Cs => "S",
            GateKind::Ct => "T",
            GateKind::Cp | GateKind::Phase => "P",
            GateKind::Sdg => "S†",
            GateKind::Tdg => "T†",
            GateKind::BitFlip => "BF",
            GateKind::PhaseFlip => "PF",
            GateKind::Depolarizing => "DEP",
            GateKind::AmplitudeDamping => "AD",
            GateKind::PhaseDamping => "PD",
            GateKind::H => "H",
            GateKind::X => "X",
            GateKind::Y => "Y",
            GateKind::Z => "Z",
            GateKind::S => "S",
            GateKind::T => "T",
            GateKind::Rx => "RX",
            GateKind::Ry => "RY",
            GateKind::Rz => "RZ",
            GateKind::Cnot | GateKind::Cz | GateKind::Swap | GateKind::Toffoli => "",
        };
        let base = match (self.config.style, op.kind()) {
            (RenderStyle::Ascii, GateKind::Sdg) => "Sdg",
            (RenderStyle::Ascii, GateKind::Tdg) => "Tdg",
            _ => base,
        };

        match op.parameter() {
            Some(p) => format!("{}({:.*})", base, self.config.float_precision, p),
            None => base.to_string(),
        }
    }

    fn boxed(&self, label: &str) -> String {
        format!("[{}]", label)
    }
}

fn role_for_index(kind: GateKind, index: usize, total: usize) -> QubitRole {
    if kind == GateKind::Swap {
        QubitRole::SwapEnd
    } else if total == 1 {
        QubitRole::Single
    } else if index < total - 1 {
        QubitRole::Control
    } else {
        QubitRole::Target
    }
}

// ============================================================================
// Utility Functions
// ============================================================================

fn digit_count(n: usize) -> usize {
    if n == 0 {
        1
    } else {
        n.ilog10() as usize + 1
    }
}

/// Width in terminal cells; every symbol used here is single-width
fn display_width(s: &str) -> usize {
    s.chars().count()
}

/// Center a string within width, padding with wire characters
fn center_with_wire(s: &str, width: usize, wire: char) -> String {
    let s_width = display_width(s);
    if s_width >= width {
        return s.to_string();
    }

    let total_pad = width - s_width;
    let left_pad = total_pad / 2;
    let right_pad = total_pad - left_pad;

    let mut result = String::with_capacity(width * wire.len_utf8() + s.len());
    result.extend(std::iter::repeat(wire).take(left_pad));
    result.push_str(s);
    result.extend(std::iter::repeat(wire).take(right_pad));
    result
}
