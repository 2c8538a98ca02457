//! Export, re-import and replay scenarios

use approx::assert_relative_eq;
use qtraj_circuit::{parse_qasm, Circuit, CircuitBuilder, CircuitError, GateKind};
use qtraj_state::StateVector;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::f64::consts::PI;

#[test]
fn test_qasm_round_trip_matches_probabilities() {
    let mut builder = CircuitBuilder::new(2, 0).unwrap();
    builder
        .h(0)
        .unwrap()
        .x(1)
        .unwrap()
        .z(0)
        .unwrap()
        .cnot(1, 0)
        .unwrap();

    let text = builder.circuit().to_qasm();
    let original = builder.state().probabilities();

    let parsed = parse_qasm(&text).unwrap();
    let mut fresh = StateVector::<f64>::new(parsed.num_qubits()).unwrap();
    let mut rng = StdRng::seed_from_u64(1);
    parsed.execute(&mut fresh, &mut rng).unwrap();

    let replayed = fresh.probabilities();
    assert_eq!(original.len(), replayed.len());
    for (a, b) in original.iter().zip(&replayed) {
        assert_relative_eq!(*a, *b, epsilon = 1e-6);
    }
    assert_relative_eq!(replayed[0b10], 0.5, epsilon = 1e-6);
    assert_relative_eq!(replayed[0b11], 0.5, epsilon = 1e-6);
}

#[test]
fn test_hand_written_program() {
    let source = r#"
        OPENQASM 2.0;
        include "qelib1.inc";
        // prepare |+> on q[0] and rotate q[1] to |1>
        qreg q[2];
        creg c[2];
        h q[0];
        ry(pi) q[1];
        barrier q[0],q[1];
        cz q[0],q[1];
        h q[0];
        measure q[0] -> c[0];
        measure q[1] -> c[1];
    "#;

    let circuit = parse_qasm(source).unwrap();
    assert_eq!(circuit.num_qubits(), 2);
    assert_eq!(circuit.len(), 6);
    assert_eq!(circuit.num_measurements(), 2);

    // CZ flips |+> to |-> when q[1] is |1>, so H brings q[0] to |1>
    for seed in 0..8 {
        let (_, outcomes) = circuit.run(seed).unwrap();
        assert_eq!(outcomes, vec![1, 1]);
    }
}

#[test]
fn test_noise_statements_replay_deterministically() {
    let source = "qreg q[3];\n\
                  x q[0];\n\
                  x q[2];\n\
                  bit_flip(1.0) q[1];\n\
                  amplitude_damping(1) q[0];\n\
                  phase_flip(0.5) q[2];\n\
                  depolarizing(0.0) q[1];\n\
                  phase_damping(0.25) q[2];\n";

    let circuit = parse_qasm(source).unwrap();
    assert_eq!(circuit.num_noise_operations(), 5);

    let (state, _) = circuit.run(3).unwrap();
    // q0 decayed to |0>, q1 flipped to |1>, q2 stays |1> up to phase
    assert_relative_eq!(state.probability_of_basis_state(0b110).unwrap(), 1.0, epsilon = 1e-12);

    let (again, _) = circuit.run(3).unwrap();
    assert_eq!(state, again);
}

#[test]
fn test_export_reparse_preserves_log() {
    let mut circuit = Circuit::new(4).unwrap();
    circuit.add(GateKind::H, &[3], None).unwrap();
    circuit.add(GateKind::Ch, &[3, 1], None).unwrap();
    circuit.add(GateKind::Cs, &[1, 0], None).unwrap();
    circuit.add(GateKind::Ct, &[0, 2], None).unwrap();
    circuit.add(GateKind::Cy, &[2, 3], None).unwrap();
    circuit.add(GateKind::Swap, &[0, 3], None).unwrap();
    circuit.add(GateKind::Phase, &[1], Some(-PI / 3.0)).unwrap();
    circuit.add(GateKind::Rx, &[2], Some(1e-7)).unwrap();
    circuit.add(GateKind::Sdg, &[0], None).unwrap();
    circuit.add(GateKind::Tdg, &[1], None).unwrap();
    circuit.add(GateKind::PhaseDamping, &[0], Some(0.3)).unwrap();

    let parsed = parse_qasm(&circuit.to_qasm()).unwrap();
    assert_eq!(parsed, circuit);
}

#[test]
fn test_parse_error_reports_position() {
    let source = "OPENQASM 2.0;\nqreg q[2];\nh q[0];\ncx q[0] q[1];\n";
    match parse_qasm(source) {
        Err(CircuitError::Parse { line, column, message }) => {
            assert_eq!(line, 4);
            assert_eq!(column, 9);
            assert!(message.contains("expected ';'"), "{}", message);
        },
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[test]
fn test_register_mismatch_on_replay() {
    let circuit = parse_qasm("qreg q[2];\nh q[0];").unwrap();
    let mut state = StateVector::<f64>::new(3).unwrap();
    let before = state.clone();
    let mut rng = StdRng::seed_from_u64(0);
    assert!(matches!(
        circuit.execute(&mut state, &mut rng),
        Err(CircuitError::RegisterMismatch { .. })
    ));
    assert_eq!(state, before);
}

#[cfg(feature = "serialization")]
#[test]
fn test_json_round_trip_replays_identically() {
    let mut builder = CircuitBuilder::new(3, 21).unwrap();
    builder
        .h(0)
        .unwrap()
        .toffoli(0, 1, 2)
        .unwrap()
        .depolarizing(2, 0.2)
        .unwrap()
        .rz(1, 0.4)
        .unwrap()
        .measure(0)
        .unwrap();
    let circuit = builder.build();

    let json = circuit.to_json().unwrap();
    let restored = Circuit::from_json(&json).unwrap();
    assert_eq!(restored, circuit);

    let (a, outcomes_a) = circuit.run(99).unwrap();
    let (b, outcomes_b) = restored.run(99).unwrap();
    assert_eq!(outcomes_a, outcomes_b);
    assert_eq!(a, b);
}

#[test]
fn test_diagram_of_parsed_program() {
    let circuit = parse_qasm("qreg q[2];\nh q[0];\ncx q[0],q[1];\nmeasure q[1] -> c[1];").unwrap();
    let text = circuit.to_ascii();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("[H]"));
    assert!(lines[0].contains('●'));
    assert!(lines[1].contains('⊕'));
    assert!(lines[1].ends_with("[M]──"));
}
