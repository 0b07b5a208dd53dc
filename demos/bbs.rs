//! BBS-style multi-message signature over encoded attributes.
//!
//! The issuer signs a vector of message scalars with a single short
//! signature `A = (g1 * prod h_i^{m_i})^{1 / (gamma + x)}`; verification
//! is one fused pairing comparison. The attribute bytes are packed into
//! scalars with the message codec and recovered afterwards.

use larc::{pair, G1Point, G2Point, Hasher, RandomEngine, Scalar};

fn main() {
    let mut rng = RandomEngine::from_entropy();

    let message = b"name=Ada Lovelace;role=analyst;clearance=blue";
    let attributes = Scalar::encode_message(message);
    println!("{} attribute scalars", attributes.len());

    // public parameters: one transcript-derived base per attribute slot
    let g1 = G1Point::generator();
    let g2 = G2Point::generator();
    let bases: Vec<G1Point> = (0..attributes.len() as u64)
        .map(|i| Hasher::new().chain(b"bbs-base").chain(&i).finalize_g1())
        .collect();

    // issuer key pair
    let gamma = Scalar::random_nonzero(&mut rng);
    let w = g2.pow(gamma).force();

    // sign: the commitment product fuses the base powers pairwise
    let x = Scalar::random(&mut rng);
    let commitment = g1 * bases
        .iter()
        .zip(&attributes)
        .map(|(h, m)| h.pow(m))
        .product::<G1Point>();
    let a = commitment.pow((gamma + x).inverse()).force();

    // verify: e(A, w * g2^x) == e(commitment, g2), one fused loop
    let shifted = w * g2.pow(x);
    assert!(
        pair(&a, &shifted) == pair(&commitment, &g2),
        "signature must verify"
    );
    println!("signature verified");

    // a tampered attribute must break verification
    let mut forged = attributes.clone();
    forged[0] = forged[0] + Scalar::one();
    let forged_commitment = g1 * bases
        .iter()
        .zip(&forged)
        .map(|(h, m)| h.pow(m))
        .product::<G1Point>();
    assert!(
        pair(&a, &shifted) != pair(&forged_commitment, &g2),
        "forged attributes must not verify"
    );
    println!("forgery rejected");

    let recovered = Scalar::decode_message(&attributes).expect("well-formed blocks");
    assert_eq!(recovered, message);
    println!("attributes recovered: {}", String::from_utf8_lossy(&recovered));
}
