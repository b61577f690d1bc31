use criterion::{criterion_group, criterion_main, Criterion};
use ember_algebra::{bn254::BN254Scalar, prelude::*};
use ember_plonk::plonk::{
    indexer::indexer, prover::prover, sample_circuits::mul_add_circuit, verifier::verifier,
};
use ember_plonk::poly_commit::{kzg_poly_com::KZGCommitmentSchemeBN254, pcs::PolyComScheme};

fn bench_verifier(c: &mut Criterion) {
    let mut prng = test_rng();
    let n = 1 << 10;
    let pcs = KZGCommitmentSchemeBN254::new(n + 2, &mut prng);
    let sample = mul_add_circuit::<BN254Scalar, _>(n, 4, &mut prng).unwrap();
    let pk = indexer(&sample.description, &pcs).unwrap();
    let proof = prover(&pcs, &pk, &sample.witness).unwrap();

    let verifier_pcs = pcs.shrink_to_verifier_only();
    let vk = pk.get_verifier_key();
    assert!(verifier(&verifier_pcs, &vk, &proof).unwrap());

    let mut group = c.benchmark_group("bench_verifier");
    group.sample_size(10);
    group.bench_function("verifier", |b| {
        b.iter(|| verifier(&verifier_pcs, &vk, &proof).unwrap())
    });
    group.finish();
}

criterion_group!(benches, bench_verifier);
criterion_main!(benches);
