use std::borrow::Cow;

use bls::{verify_signature_sets, Hash256, Keypair, PublicKey, Signature, SignatureSet};
use criterion::{criterion_group, criterion_main, Criterion};

pub fn bench_single_verify(c: &mut Criterion) {
    let keypair = Keypair::random();
    let msg = Hash256::repeat_byte(42);
    let sig = keypair.sk.sign(msg);

    c.bench_function("verify single signature", |b| {
        b.iter(|| sig.verify(&keypair.pk, msg))
    });
}

pub fn bench_verify_signature_sets(c: &mut Criterion) {
    let keypairs: Vec<_> = (0..256).map(|_| Keypair::random()).collect();
    let msgs: Vec<_> = (0..keypairs.len() as u64)
        .map(Hash256::from_low_u64_be)
        .collect();
    let sigs: Vec<Signature> = keypairs
        .iter()
        .zip(&msgs)
        .map(|(kp, msg)| kp.sk.sign(*msg))
        .collect();

    for num_sets in [1, 8, 32, 128, 256].iter() {
        let sets: Vec<_> = (0..*num_sets)
            .map(|i| {
                SignatureSet::single_pubkey(
                    &sigs[i],
                    Cow::<PublicKey>::Borrowed(&keypairs[i].pk),
                    msgs[i],
                )
            })
            .collect();

        c.bench_function(&format!("verify {} signature sets", num_sets), |b| {
            b.iter(|| verify_signature_sets(sets.iter()))
        });
    }
}

criterion_group!(
    benches,
    bench_single_verify,
    bench_verify_signature_sets
);
criterion_main!(benches);
