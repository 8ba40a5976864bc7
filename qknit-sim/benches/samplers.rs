use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use qknit_core::Circuit;
use qknit_gates::CircuitExt;
use qknit_sim::{simulate_statevector, ExactSampler, Sampler, ShotSampler, ShotSamplerConfig};

fn create_layered_circuit(num_qubits: usize, depth: usize) -> Circuit {
    let mut circuit = Circuit::new(num_qubits);

    for d in 0..depth {
        // Single qubit gates layer
        for q in 0..num_qubits {
            if (q + d) % 2 == 0 {
                circuit.h(q).unwrap();
            } else {
                circuit.rz(0.5, q).unwrap();
            }
        }

        // Entangling layer
        for q in 0..num_qubits - 1 {
            if (q + d) % 2 == 0 {
                circuit.cx(q, q + 1).unwrap();
            }
        }
    }

    circuit
}

/// Layered circuit with a mid-circuit measurement per qubit after each layer
fn create_branching_circuit(num_qubits: usize, depth: usize) -> Circuit {
    let mut circuit = Circuit::new(num_qubits);
    circuit.add_register("mid", num_qubits * depth).unwrap();
    circuit.add_register("c", num_qubits).unwrap();

    for d in 0..depth {
        for q in 0..num_qubits {
            circuit.ry(0.3 * (q + 1) as f64, q).unwrap();
        }
        for q in 0..num_qubits - 1 {
            circuit.cx(q, q + 1).unwrap();
        }
        for q in 0..num_qubits {
            circuit.measure(q, d * num_qubits + q).unwrap();
        }
    }
    for q in 0..num_qubits {
        circuit.h(q).unwrap();
        circuit.measure(q, depth * num_qubits + q).unwrap();
    }

    circuit
}

fn bench_statevector(c: &mut Criterion) {
    let mut group = c.benchmark_group("statevector");

    for num_qubits in [10, 15, 20].iter() {
        let depth = 20;
        let circuit = create_layered_circuit(*num_qubits, depth);

        group.bench_with_input(
            BenchmarkId::new("layered", format!("{}q_d{}", num_qubits, depth)),
            &circuit,
            |b, circuit| b.iter(|| simulate_statevector(black_box(circuit)).unwrap()),
        );
    }

    group.finish();
}

fn bench_samplers(c: &mut Criterion) {
    let mut group = c.benchmark_group("samplers");

    for (num_qubits, depth) in [(2, 2), (3, 2), (4, 1)].iter() {
        let circuits = vec![create_branching_circuit(*num_qubits, *depth); 16];
        let exact = ExactSampler::new();
        let shots = ShotSampler::new(ShotSamplerConfig::new().with_shots(1024).with_seed(0)).unwrap();

        group.bench_with_input(
            BenchmarkId::new("exact_branching", format!("{}q_d{}", num_qubits, depth)),
            &circuits,
            |b, circuits| b.iter(|| exact.run(black_box(circuits)).unwrap()),
        );
        group.bench_with_input(
            BenchmarkId::new("shots_branching", format!("{}q_d{}", num_qubits, depth)),
            &circuits,
            |b, circuits| b.iter(|| shots.run(black_box(circuits)).unwrap()),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_statevector, bench_samplers);
criterion_main!(benches);
