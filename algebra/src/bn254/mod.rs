/// The number of bytes for a scalar value over BN254.
pub const BN254_SCALAR_LEN: usize = 32;

mod fr;
pub use fr::*;

mod g1;
pub use g1::*;

mod g2;
pub use g2::*;

mod gt;
pub use gt::*;

mod pairing;
pub use pairing::*;

#[cfg(test)]
mod bn254_groups_test {
    use crate::bn254::{BN254Gt, BN254PairingEngine, BN254Scalar, BN254G1, BN254G2};
    use crate::prelude::*;
    use crate::traits::group_tests::{test_scalar_operations, test_scalar_serialization};
    use rand_chacha::ChaChaRng;

    #[test]
    fn test_scalar_ops() {
        test_scalar_operations::<BN254Scalar>();
    }

    #[test]
    fn scalar_deser() {
        test_scalar_serialization::<BN254Scalar>();
    }

    #[test]
    fn scalar_from_to_bytes() {
        let small_value = BN254Scalar::from(165747u32);
        let small_value_bytes = small_value.to_bytes();
        let expected_small_value_bytes: [u8; 32] = [
            115, 135, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
            0, 0, 0, 0,
        ];
        assert_eq!(small_value_bytes, expected_small_value_bytes);

        let small_value_from_bytes = BN254Scalar::from_bytes(&small_value_bytes).unwrap();
        assert_eq!(small_value_from_bytes, small_value);
    }

    #[test]
    fn generator_is_not_a_square() {
        // g^((r-1)/2) = -1 for a quadratic non-residue g
        let g = BN254Scalar::multiplicative_generator();
        let minus_one_half = (-BN254Scalar::one()).get_little_endian_u64();
        let mut half = [0u64; 4];
        for i in 0..4 {
            half[i] = minus_one_half[i] >> 1;
            if i < 3 {
                half[i] |= minus_one_half[i + 1] << 63;
            }
        }
        assert_eq!(g.pow(&half), -BN254Scalar::one());
    }

    #[test]
    fn bilinear_properties() {
        let identity_g1 = BN254G1::get_identity();
        let identity_g2 = BN254G2::get_identity();
        let identity_gt_computed = BN254PairingEngine::pairing(&identity_g1, &identity_g2);
        assert_eq!(BN254Gt::get_identity(), identity_gt_computed);

        let mut prng = ChaChaRng::from_seed([0u8; 32]);

        let s1 = BN254Scalar::from(50 + prng.next_u32() % 50);
        let s2 = BN254Scalar::from(50 + prng.next_u32() % 50);

        let base_g1 = BN254G1::get_base();
        let base_g2 = BN254G2::get_base();

        let s1_base_g1 = base_g1.mul(&s1);
        let s2_base_g2 = base_g2.mul(&s2);

        let gt_mapped_element = BN254PairingEngine::pairing(&s1_base_g1, &s2_base_g2);
        let gt_base_computed = BN254PairingEngine::pairing(&base_g1, &base_g2);
        assert_eq!(BN254Gt::get_base(), gt_base_computed);

        assert_eq!(
            gt_mapped_element,
            BN254PairingEngine::pairing(&base_g1, &s2_base_g2).mul(&s1)
        );
        assert_eq!(gt_mapped_element, gt_base_computed.mul(&s1).mul(&s2));
    }

    #[test]
    fn product_of_pairings_cancels() {
        let mut prng = ChaChaRng::from_seed([1u8; 32]);
        let a = BN254G1::random(&mut prng);
        let b = BN254G2::random(&mut prng);
        let gt = BN254PairingEngine::product_of_pairings(&[a, a.neg()], &[b, b]);
        assert_eq!(gt, BN254PairingEngine::gt_identity());
    }

    #[test]
    fn test_serialization_of_points() {
        let mut prng = ChaChaRng::from_seed([2u8; 32]);

        let g1 = BN254G1::random(&mut prng);
        let g1_bytes = g1.to_uncompressed_bytes();
        assert_eq!(g1_bytes.len(), BN254G1::UNCOMPRESSED_LEN);
        assert_eq!(g1, BN254G1::from_uncompressed_bytes(&g1_bytes).unwrap());

        let identity_bytes = BN254G1::get_identity().to_uncompressed_bytes();
        assert_eq!(
            BN254G1::get_identity(),
            BN254G1::from_uncompressed_bytes(&identity_bytes).unwrap()
        );

        let g2 = BN254G2::random(&mut prng);
        let g2_bytes = g2.to_uncompressed_bytes();
        assert_eq!(g2_bytes.len(), BN254G2::UNCOMPRESSED_LEN);
        assert_eq!(g2, BN254G2::from_uncompressed_bytes(&g2_bytes).unwrap());

        // (1, 1) is not on the curve
        let mut off_curve = vec![0u8; 64];
        off_curve[0] = 1;
        off_curve[32] = 1;
        assert!(BN254G1::from_uncompressed_bytes(&off_curve).is_err());
        assert!(BN254G1::from_uncompressed_bytes(&g1_bytes[1..]).is_err());
    }

    #[test]
    fn test_serde_round_trip() {
        let mut prng = ChaChaRng::from_seed([4u8; 32]);
        let s = BN254Scalar::random(&mut prng);
        let g = BN254G1::random(&mut prng);

        let s_json = serde_json::to_string(&s).unwrap();
        assert_eq!(s, serde_json::from_str::<BN254Scalar>(&s_json).unwrap());

        let g_bin = bincode::serialize(&g).unwrap();
        assert_eq!(g, bincode::deserialize::<BN254G1>(&g_bin).unwrap());
    }
}
