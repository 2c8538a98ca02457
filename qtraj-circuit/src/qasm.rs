//! OpenQASM 2.0 style text format
//!
//! Export writes one statement per operation on a single `q` register:
//!
//! ```text
//! OPENQASM 2.0;
//! include "qelib1.inc";
//! qreg q[2];
//! creg c[2];
//! h q[0];
//! cx q[0],q[1];
//! rz(0.25) q[1];
//! bit_flip(0.1) q[0];
//! measure q[0] -> c[0];
//! ```
//!
//! Noise channels are written as parametrized statements named after the
//! channel. Qubit `k` is `q[k]`, matching the little-endian basis index.
//!
//! Import is a tokenizer followed by a recursive-descent parser. Gate
//! parameters are arithmetic expressions over numbers and `pi` with
//! `+ - * /`, unary minus and parentheses. `barrier` statements are accepted
//! and ignored. Every error carries the line and column of the offending
//! token.

use crate::circuit::Circuit;
use crate::error::{CircuitError, Result};
use crate::operation::{GateKind, Operation};
use std::f64::consts::PI;
use std::fmt::Write;
use tracing::debug;

const HEADER_VERSION: &str = "2.0";

// ============================================================================
// Export
// ============================================================================

/// Render a circuit in the text format
pub fn to_qasm(circuit: &Circuit) -> String {
    let mut out = String::new();
    let n = circuit.num_qubits();

    // Writing to a String cannot fail
    let _ = writeln!(out, "OPENQASM {};", HEADER_VERSION);
    let _ = writeln!(out, "include \"qelib1.inc\";");
    let _ = writeln!(out, "qreg q[{}];", n);
    if circuit.num_measurements() > 0 {
        let _ = writeln!(out, "creg c[{}];", n);
    }

    for op in circuit.operations() {
        let _ = writeln!(out, "{}", statement(op));
    }
    out
}

fn statement(op: &Operation) -> String {
    let qubits: Vec<String> = op.qubits().iter().map(|q| format!("q[{}]", q)).collect();

    if op.kind() == GateKind::Measure {
        let q = op.qubits()[0];
        return format!("measure q[{}] -> c[{}];", q, q);
    }

    match op.parameter() {
        Some(p) => format!("{}({}) {};", op.kind().name(), p, qubits.join(",")),
        None => format!("{} {};", op.kind().name(), qubits.join(",")),
    }
}

// ============================================================================
// Tokenizer
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum TokenKind {
    Ident(String),
    Number(f64),
    Str(String),
    Semicolon,
    Comma,
    LBracket,
    RBracket,
    LParen,
    RParen,
    Plus,
    Minus,
    Star,
    Slash,
    Arrow,
    Eof,
}

impl TokenKind {
    fn describe(&self) -> String {
        match self {
            TokenKind::Ident(name) => format!("identifier '{}'", name),
            TokenKind::Number(v) => format!("number {}", v),
            TokenKind::Str(s) => format!("string \"{}\"", s),
            TokenKind::Semicolon => "';'".to_string(),
            TokenKind::Comma => "','".to_string(),
            TokenKind::LBracket => "'['".to_string(),
            TokenKind::RBracket => "']'".to_string(),
            TokenKind::LParen => "'('".to_string(),
            TokenKind::RParen => "')'".to_string(),
            TokenKind::Plus => "'+'".to_string(),
            TokenKind::Minus => "'-'".to_string(),
            TokenKind::Star => "'*'".to_string(),
            TokenKind::Slash => "'/'".to_string(),
            TokenKind::Arrow => "'->'".to_string(),
            TokenKind::Eof => "end of input".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
struct Token {
    kind: TokenKind,
    line: usize,
    column: usize,
}

struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            chars: source.chars().peekable(),
            line: 1,
            column: 1,
        }
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn skip_trivia(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.bump();
            } else if c == '/' {
                // Only `//` starts a comment; a lone '/' is division
                let mut ahead = self.chars.clone();
                ahead.next();
                if ahead.peek() != Some(&'/') {
                    return;
                }
                while let Some(c) = self.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.bump();
                }
            } else {
                return;
            }
        }
    }

    fn tokenize(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            self.skip_trivia();
            let (line, column) = (self.line, self.column);
            let Some(c) = self.peek() else {
                tokens.push(Token {
                    kind: TokenKind::Eof,
                    line,
                    column,
                });
                return Ok(tokens);
            };

            let kind = if c.is_ascii_alphabetic() || c == '_' {
                TokenKind::Ident(self.take_while(|c| c.is_ascii_alphanumeric() || c == '_'))
            } else if c.is_ascii_digit() || c == '.' {
                self.number(line, column)?
            } else if c == '"' {
                self.bump();
                let text = self.take_while(|c| c != '"' && c != '\n');
                if self.bump() != Some('"') {
                    return Err(CircuitError::parse(line, column, "unterminated string"));
                }
                TokenKind::Str(text)
            } else {
                self.bump();
                match c {
                    ';' => TokenKind::Semicolon,
                    ',' => TokenKind::Comma,
                    '[' => TokenKind::LBracket,
                    ']' => TokenKind::RBracket,
                    '(' => TokenKind::LParen,
                    ')' => TokenKind::RParen,
                    '+' => TokenKind::Plus,
                    '*' => TokenKind::Star,
                    '/' => TokenKind::Slash,
                    '-' => {
                        if self.peek() == Some('>') {
                            self.bump();
                            TokenKind::Arrow
                        } else {
                            TokenKind::Minus
                        }
                    },
                    other => {
                        return Err(CircuitError::parse(
                            line,
                            column,
                            format!("unexpected character '{}'", other),
                        ))
                    },
                }
            };

            tokens.push(Token { kind, line, column });
        }
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            text.push(c);
            self.bump();
        }
        text
    }

    fn number(&mut self, line: usize, column: usize) -> Result<TokenKind> {
        let mut text = self.take_while(|c| c.is_ascii_digit() || c == '.');
        if matches!(self.peek(), Some('e') | Some('E')) {
            text.push('e');
            self.bump();
            if let Some(sign @ ('+' | '-')) = self.peek() {
                text.push(sign);
                self.bump();
            }
            text.push_str(&self.take_while(|c| c.is_ascii_digit()));
        }
        text.parse::<f64>()
            .map(TokenKind::Number)
            .map_err(|_| CircuitError::parse(line, column, format!("malformed number '{}'", text)))
    }
}

// ============================================================================
// Parser
// ============================================================================

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    qreg: Option<String>,
    creg: Option<(String, usize)>,
    circuit: Option<Circuit>,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            qreg: None,
            creg: None,
            circuit: None,
        }
    }

    fn peek(&self) -> &Token {
        // The token list always ends with Eof
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn error_at(token: &Token, message: impl Into<String>) -> CircuitError {
        CircuitError::parse(token.line, token.column, message)
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token> {
        let token = self.advance();
        if token.kind != kind {
            return Err(Self::error_at(
                &token,
                format!("expected {}, found {}", kind.describe(), token.kind.describe()),
            ));
        }
        Ok(token)
    }

    fn expect_ident(&mut self) -> Result<(String, Token)> {
        let token = self.advance();
        match &token.kind {
            TokenKind::Ident(name) => Ok((name.clone(), token)),
            other => Err(Self::error_at(
                &token,
                format!("expected identifier, found {}", other.describe()),
            )),
        }
    }

    fn expect_index(&mut self) -> Result<usize> {
        let token = self.advance();
        match token.kind {
            TokenKind::Number(v) if v >= 0.0 && v.fract() == 0.0 && v <= usize::MAX as f64 => {
                Ok(v as usize)
            },
            ref other => Err(Self::error_at(
                &token,
                format!("expected non-negative integer, found {}", other.describe()),
            )),
        }
    }

    fn parse_program(mut self) -> Result<Circuit> {
        if matches!(&self.peek().kind, TokenKind::Ident(name) if name == "OPENQASM") {
            self.advance();
            let version = self.advance();
            if !matches!(version.kind, TokenKind::Number(_)) {
                return Err(Self::error_at(&version, "expected version number after OPENQASM"));
            }
            self.expect(TokenKind::Semicolon)?;
        }

        while self.peek().kind != TokenKind::Eof {
            self.statement()?;
        }

        let eof = self.peek().clone();
        self.circuit
            .ok_or_else(|| Self::error_at(&eof, "missing qreg declaration"))
    }

    fn statement(&mut self) -> Result<()> {
        let (keyword, token) = self.expect_ident()?;
        match keyword.as_str() {
            "include" => {
                let path = self.advance();
                if !matches!(path.kind, TokenKind::Str(_)) {
                    return Err(Self::error_at(&path, "expected file name after include"));
                }
                self.expect(TokenKind::Semicolon)?;
            },
            "qreg" => self.qreg_decl(&token)?,
            "creg" => {
                let (name, _) = self.expect_ident()?;
                self.expect(TokenKind::LBracket)?;
                let size = self.expect_index()?;
                self.expect(TokenKind::RBracket)?;
                self.expect(TokenKind::Semicolon)?;
                self.creg = Some((name, size));
            },
            "barrier" => {
                self.qargs()?;
                self.expect(TokenKind::Semicolon)?;
            },
            "measure" => {
                let qubit = self.qarg()?;
                self.expect(TokenKind::Arrow)?;
                self.carg()?;
                self.expect(TokenKind::Semicolon)?;
                self.push(&token, GateKind::Measure, &[qubit], None)?;
            },
            name => {
                let kind = GateKind::from_name(name)
                    .filter(|k| *k != GateKind::Measure)
                    .ok_or_else(|| Self::error_at(&token, format!("unknown gate '{}'", name)))?;

                let parameter = if self.peek().kind == TokenKind::LParen {
                    self.advance();
                    let value = self.expr()?;
                    self.expect(TokenKind::RParen)?;
                    Some(value)
                } else {
                    None
                };

                let qubits = self.qargs()?;
                self.expect(TokenKind::Semicolon)?;
                self.push(&token, kind, &qubits, parameter)?;
            },
        }
        Ok(())
    }

    fn qreg_decl(&mut self, token: &Token) -> Result<()> {
        if self.qreg.is_some() {
            return Err(Self::error_at(token, "only one qreg declaration is supported"));
        }
        let (name, _) = self.expect_ident()?;
        self.expect(TokenKind::LBracket)?;
        let size_token = self.peek().clone();
        let size = self.expect_index()?;
        self.expect(TokenKind::RBracket)?;
        self.expect(TokenKind::Semicolon)?;

        let circuit = Circuit::new(size).map_err(|e| Self::error_at(&size_token, e.to_string()))?;
        self.qreg = Some(name);
        self.circuit = Some(circuit);
        Ok(())
    }

    fn push(&mut self, token: &Token, kind: GateKind, qubits: &[usize], parameter: Option<f64>) -> Result<()> {
        let circuit = self
            .circuit
            .as_mut()
            .ok_or_else(|| Self::error_at(token, "qreg must be declared before operations"))?;
        Operation::new(kind, qubits, parameter)
            .and_then(|op| circuit.push(op))
            .map_err(|e| Self::error_at(token, e.to_string()))
    }

    fn qargs(&mut self) -> Result<Vec<usize>> {
        let mut qubits = vec![self.qarg()?];
        while self.peek().kind == TokenKind::Comma {
            self.advance();
            qubits.push(self.qarg()?);
        }
        Ok(qubits)
    }

    /// `name[index]` on the quantum register
    fn qarg(&mut self) -> Result<usize> {
        let (name, token) = self.expect_ident()?;
        match &self.qreg {
            Some(qreg) if *qreg == name => {},
            Some(qreg) => {
                return Err(Self::error_at(
                    &token,
                    format!("unknown register '{}', expected '{}'", name, qreg),
                ))
            },
            None => return Err(Self::error_at(&token, "qreg must be declared before operations")),
        }
        self.expect(TokenKind::LBracket)?;
        let index = self.expect_index()?;
        self.expect(TokenKind::RBracket)?;
        Ok(index)
    }

    /// `name[index]` on the classical register
    fn carg(&mut self) -> Result<usize> {
        let (name, token) = self.expect_ident()?;
        if let Some((creg, _)) = &self.creg {
            if *creg != name {
                return Err(Self::error_at(&token, format!("unknown classical register '{}'", name)));
            }
        }
        self.expect(TokenKind::LBracket)?;
        let index_token = self.peek().clone();
        let index = self.expect_index()?;
        if let Some((_, size)) = &self.creg {
            if index >= *size {
                return Err(Self::error_at(
                    &index_token,
                    format!("classical bit {} out of range for {}", index, name),
                ));
            }
        }
        self.expect(TokenKind::RBracket)?;
        Ok(index)
    }

    // expr := term (('+' | '-') term)*
    fn expr(&mut self) -> Result<f64> {
        let mut value = self.term()?;
        loop {
            match self.peek().kind {
                TokenKind::Plus => {
                    self.advance();
                    value += self.term()?;
                },
                TokenKind::Minus => {
                    self.advance();
                    value -= self.term()?;
                },
                _ => return Ok(value),
            }
        }
    }

    // term := unary (('*' | '/') unary)*
    fn term(&mut self) -> Result<f64> {
        let mut value = self.unary()?;
        loop {
            match self.peek().kind {
                TokenKind::Star => {
                    self.advance();
                    value *= self.unary()?;
                },
                TokenKind::Slash => {
                    let token = self.advance();
                    let divisor = self.unary()?;
                    if divisor == 0.0 {
                        return Err(Self::error_at(&token, "division by zero in parameter"));
                    }
                    value /= divisor;
                },
                _ => return Ok(value),
            }
        }
    }

    // unary := ('-' | '+') unary | primary
    fn unary(&mut self) -> Result<f64> {
        match self.peek().kind {
            TokenKind::Minus => {
                self.advance();
                Ok(-self.unary()?)
            },
            TokenKind::Plus => {
                self.advance();
                self.unary()
            },
            _ => self.primary(),
        }
    }

    // primary := number | 'pi' | '(' expr ')'
    fn primary(&mut self) -> Result<f64> {
        let token = self.advance();
        match &token.kind {
            TokenKind::Number(v) => Ok(*v),
            TokenKind::Ident(name) if name == "pi" => Ok(PI),
            TokenKind::LParen => {
                let value = self.expr()?;
                self.expect(TokenKind::RParen)?;
                Ok(value)
            },
            other => Err(Self::error_at(
                &token,
                format!("expected expression, found {}", other.describe()),
            )),
        }
    }
}

/// Parse the text format into a circuit
///
/// # Errors
/// Returns [`CircuitError::Parse`] with the line and column of the first
/// problem found.
pub fn parse_qasm(source: &str) -> Result<Circuit> {
    let tokens = Lexer::new(source).tokenize()?;
    let circuit = Parser::new(tokens).parse_program()?;
    debug!(
        num_qubits = circuit.num_qubits(),
        operations = circuit.len(),
        "parsed circuit"
    );
    Ok(circuit)
}

impl Circuit {
    /// Render this circuit in the text format
    pub fn to_qasm(&self) -> String {
        to_qasm(self)
    }

    /// Parse a circuit from the text format
    pub fn from_qasm(source: &str) -> Result<Self> {
        parse_qasm(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn parse_err(source: &str) -> (usize, usize, String) {
        match parse_qasm(source) {
            Err(CircuitError::Parse {
                line,
                column,
                message,
            }) => (line, column, message),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_export_format() {
        let mut circuit = Circuit::new(2).unwrap();
        circuit.add(GateKind::H, &[0], None).unwrap();
        circuit.add(GateKind::Cnot, &[0, 1], None).unwrap();
        circuit.add(GateKind::Rz, &[1], Some(0.25)).unwrap();
        circuit.add(GateKind::BitFlip, &[0], Some(0.1)).unwrap();
        circuit.add(GateKind::Measure, &[0], None).unwrap();

        let expected = "OPENQASM 2.0;\n\
                        include \"qelib1.inc\";\n\
                        qreg q[2];\n\
                        creg c[2];\n\
                        h q[0];\n\
                        cx q[0],q[1];\n\
                        rz(0.25) q[1];\n\
                        bit_flip(0.1) q[0];\n\
                        measure q[0] -> c[0];\n";
        assert_eq!(circuit.to_qasm(), expected);
    }

    #[test]
    fn test_export_then_parse_is_identity() {
        let mut circuit = Circuit::new(3).unwrap();
        circuit.add(GateKind::Ry, &[0], Some(-1.234_567_890_123)).unwrap();
        circuit.add(GateKind::Toffoli, &[0, 1, 2], None).unwrap();
        circuit.add(GateKind::Cp, &[2, 0], Some(PI / 7.0)).unwrap();
        circuit.add(GateKind::AmplitudeDamping, &[1], Some(0.05)).unwrap();
        circuit.add(GateKind::Measure, &[2], None).unwrap();

        let parsed = parse_qasm(&circuit.to_qasm()).unwrap();
        assert_eq!(parsed, circuit);
    }

    #[test]
    fn test_parameter_expressions() {
        let source = "qreg q[1];\n\
                      rx(pi/2) q[0];\n\
                      ry(-pi / 4 + 0.5) q[0];\n\
                      rz(2*(pi - 1)) q[0];\n\
                      p(--1.5e-1) q[0];\n";
        let circuit = parse_qasm(source).unwrap();
        let params: Vec<f64> = circuit
            .operations()
            .iter()
            .filter_map(|op| op.parameter())
            .collect();
        assert_relative_eq!(params[0], PI / 2.0, epsilon = 1e-15);
        assert_relative_eq!(params[1], -PI / 4.0 + 0.5, epsilon = 1e-15);
        assert_relative_eq!(params[2], 2.0 * (PI - 1.0), epsilon = 1e-15);
        assert_relative_eq!(params[3], 0.15, epsilon = 1e-15);
    }

    #[test]
    fn test_comments_and_aliases() {
        let source = "// Bell pair\n\
                      OPENQASM 2.0;\n\
                      qreg r[2]; // two qubits\n\
                      h r[0];\n\
                      CNOT r[0], r[1];\n\
                      barrier r[0], r[1];\n";
        let circuit = parse_qasm(source).unwrap();
        assert_eq!(circuit.len(), 2);
        assert_eq!(circuit.operations()[1].kind(), GateKind::Cnot);
    }

    #[test]
    fn test_unknown_gate_position() {
        let (line, column, message) = parse_err("qreg q[1];\n  foo q[0];\n");
        assert_eq!((line, column), (2, 3));
        assert!(message.contains("unknown gate 'foo'"));
    }

    #[test]
    fn test_missing_semicolon() {
        let (line, column, message) = parse_err("qreg q[1];\nh q[0]\nx q[0];");
        assert_eq!((line, column), (3, 1));
        assert!(message.contains("expected ';'"));
    }

    #[test]
    fn test_qubit_out_of_range() {
        let (line, _, message) = parse_err("qreg q[2];\nx q[0];\ncx q[0],q[5];\n");
        assert_eq!(line, 3);
        assert!(message.contains("Invalid qubit index 5"));
    }

    #[test]
    fn test_operation_before_qreg() {
        let (_, _, message) = parse_err("h q[0];\nqreg q[1];");
        assert!(message.contains("qreg must be declared"));
    }

    #[test]
    fn test_missing_qreg() {
        let (line, _, message) = parse_err("OPENQASM 2.0;\n");
        assert_eq!(line, 2);
        assert!(message.contains("missing qreg"));
    }

    #[test]
    fn test_bad_noise_parameter() {
        let (_, _, message) = parse_err("qreg q[1];\ndepolarizing(1.5) q[0];");
        assert!(message.contains("must be in [0, 1]"));
    }

    #[test]
    fn test_missing_parameter() {
        let (_, _, message) = parse_err("qreg q[1];\nrx q[0];");
        assert!(message.contains("requires a parameter"));
    }

    #[test]
    fn test_unexpected_character() {
        let (line, column, _) = parse_err("qreg q[1];\nh q[0] $;");
        assert_eq!((line, column), (2, 8));
    }

    #[test]
    fn test_oversized_register_rejected() {
        let (line, column, message) = parse_err("OPENQASM 2.0;\nqreg q[1000000000];\nh q[0];");
        assert_eq!((line, column), (2, 8));
        assert!(message.contains("maximum is 30"), "{}", message);
    }

    #[test]
    fn test_non_finite_angle_rejected() {
        let (line, _, message) = parse_err("qreg q[1];\nrx(1e308*10) q[0];");
        assert_eq!(line, 2);
        assert!(message.contains("must be finite"), "{}", message);
    }

    #[test]
    fn test_division_by_zero() {
        let (_, _, message) = parse_err("qreg q[1];\nrx(pi/0) q[0];");
        assert!(message.contains("division by zero"));
    }
}
