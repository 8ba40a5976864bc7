use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use qknit_core::Circuit;
use qknit_cutting::{
    char_labels, execute_experiments_with_options, generate_qpd_weights, partition_problem,
    reconstruct_expectation_values, ExecutionOptions, QpdBasis, SamplerInput,
};
use qknit_gates::{CircuitExt, CNot, RZZ};
use qknit_sim::ExactSampler;
use qknit_state::PauliList;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Two halves joined by `num_cuts` entangling gates
fn create_cut_circuit(num_qubits: usize, num_cuts: usize) -> Circuit {
    let half = num_qubits / 2;
    let mut circuit = Circuit::new(num_qubits);
    for q in 0..num_qubits {
        circuit.h(q).unwrap();
    }
    for q in 0..num_qubits - 1 {
        if q + 1 != half {
            circuit.cx(q, q + 1).unwrap();
        }
    }
    for k in 0..num_cuts {
        let a = (half - 1).saturating_sub(k % half);
        let b = half + k % half;
        if k % 2 == 0 {
            circuit.cx(a, b).unwrap();
        } else {
            circuit.rzz(0.3, a, b).unwrap();
        }
    }
    circuit
}

fn labels(num_qubits: usize) -> Vec<String> {
    let half = num_qubits / 2;
    char_labels(&format!("{}{}", "A".repeat(half), "B".repeat(num_qubits - half)))
}

fn bench_weights(c: &mut Criterion) {
    let mut group = c.benchmark_group("qpd_weights");

    for num_cuts in [1, 2, 4, 6].iter() {
        let bases: Vec<QpdBasis> = (0..*num_cuts)
            .map(|k| {
                if k % 2 == 0 {
                    QpdBasis::from_gate(&CNot).unwrap()
                } else {
                    QpdBasis::from_gate(&RZZ::new(0.3)).unwrap()
                }
            })
            .collect();

        group.bench_with_input(BenchmarkId::new("cuts", num_cuts), &bases, |b, bases| {
            let mut rng = StdRng::seed_from_u64(0);
            b.iter(|| generate_qpd_weights(black_box(bases), 1000, &mut rng).unwrap());
        });
    }

    group.finish();
}

fn bench_workflow(c: &mut Criterion) {
    let mut group = c.benchmark_group("cutting_workflow");
    group.sample_size(10);

    for (num_qubits, num_cuts) in [(4, 1), (6, 2), (8, 3)].iter() {
        let circuit = create_cut_circuit(*num_qubits, *num_cuts);
        let observables =
            PauliList::from_labels(&["Z".repeat(*num_qubits), "X".repeat(*num_qubits)]).unwrap();
        let problem = partition_problem(&circuit, &labels(*num_qubits), Some(&observables)).unwrap();
        let subobservables = problem.subobservables.unwrap();
        let options = ExecutionOptions::new().with_seed(1);

        group.bench_function(BenchmarkId::new("execute_reconstruct", format!("{}q_{}cuts", num_qubits, num_cuts)), |b| {
            b.iter(|| {
                let results = execute_experiments_with_options(
                    problem.subcircuits.clone(),
                    subobservables.clone(),
                    1000,
                    SamplerInput::single(ExactSampler::new()),
                    &options,
                )
                .unwrap();
                black_box(reconstruct_expectation_values(&results, subobservables.clone()).unwrap())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_weights, bench_workflow);
criterion_main!(benches);
