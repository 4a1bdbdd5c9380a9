use ark_bn254::{Bn254, Fr};
use common::constants::FIELD_ELEMENT_BYTES;
use common::field_conversion::{
    ark_to_decimal, be_bytes_to_decimal, decimal_to_ark, decimal_to_be_bytes,
};
use serde::{Deserialize, Serialize};

use super::raw::{RawEncoding, PROOF_RAW_SIZE};
use crate::groth16::Proof;
use crate::utils::errors::ArtifactError;

/// A proof as decimal strings, in the shape Solidity verifiers take as calldata:
/// `A = [x, y]`, `B = [[x1, x0], [y1, y0]]`, `C = [x, y]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofJson {
    #[serde(rename = "A")]
    pub a: [String; 2],
    #[serde(rename = "B")]
    pub b: [[String; 2]; 2],
    #[serde(rename = "C")]
    pub c: [String; 2],
}

impl From<&Proof<Bn254>> for ProofJson {
    /// Slices the raw encoding into 32-byte words, so the strings match it word for word.
    fn from(proof: &Proof<Bn254>) -> Self {
        let raw = proof.to_raw_bytes();
        let word = |i: usize| {
            let mut bytes = [0u8; FIELD_ELEMENT_BYTES];
            bytes.copy_from_slice(&raw[i * FIELD_ELEMENT_BYTES..(i + 1) * FIELD_ELEMENT_BYTES]);
            be_bytes_to_decimal(&bytes)
        };
        ProofJson {
            a: [word(0), word(1)],
            b: [[word(2), word(3)], [word(4), word(5)]],
            c: [word(6), word(7)],
        }
    }
}

impl TryFrom<&ProofJson> for Proof<Bn254> {
    type Error = ArtifactError;

    fn try_from(json: &ProofJson) -> Result<Self, Self::Error> {
        let words = json
            .a
            .iter()
            .chain(json.b.iter().flatten())
            .chain(json.c.iter());
        let mut raw = Vec::with_capacity(PROOF_RAW_SIZE);
        for word in words {
            let bytes = decimal_to_be_bytes(word)
                .ok_or_else(|| ArtifactError::InvalidDecimal(word.clone()))?;
            raw.extend_from_slice(&bytes);
        }
        Proof::from_raw_bytes(&raw)
    }
}

/// Public inputs as decimal strings, in declaration order.
pub fn public_input_to_json(public_input: &[Fr]) -> Vec<String> {
    public_input
        .iter()
        .map(ark_to_decimal)
        .collect()
}

pub fn public_input_from_json(values: &[String]) -> Result<Vec<Fr>, ArtifactError> {
    values
        .iter()
        .map(|s| decimal_to_ark(s).ok_or_else(|| ArtifactError::InvalidDecimal(s.clone())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::{G1Affine, G2Affine};
    use ark_ec::{AffineRepr, CurveGroup};

    fn sample_proof() -> Proof<Bn254> {
        Proof {
            a: (G1Affine::generator() * Fr::from(2u64)).into_affine(),
            b: (G2Affine::generator() * Fr::from(3u64)).into_affine(),
            c: G1Affine::generator(),
        }
    }

    #[test]
    fn proof_json_shape() {
        let json = serde_json::to_value(ProofJson::from(&sample_proof())).unwrap();
        let object = json.as_object().unwrap();
        assert_eq!(object.len(), 3);
        assert_eq!(object["A"].as_array().unwrap().len(), 2);
        assert_eq!(object["B"][1].as_array().unwrap().len(), 2);
        // the BN254 G1 generator is (1, 2)
        assert_eq!(object["C"], serde_json::json!(["1", "2"]));
    }

    #[test]
    fn proof_parses_back() {
        let proof = sample_proof();
        let text = serde_json::to_string(&ProofJson::from(&proof)).unwrap();
        let parsed: ProofJson = serde_json::from_str(&text).unwrap();
        assert_eq!(Proof::<Bn254>::try_from(&parsed).unwrap(), proof);
    }

    #[test]
    fn bad_proof_words_are_rejected() {
        let mut json = ProofJson::from(&sample_proof());
        json.c[1] = "two".to_string();
        assert!(matches!(
            Proof::<Bn254>::try_from(&json),
            Err(ArtifactError::InvalidDecimal(s)) if s == "two"
        ));

        json.c[1] = "3".to_string();
        assert!(matches!(
            Proof::<Bn254>::try_from(&json),
            Err(ArtifactError::InvalidPoint("G1"))
        ));
    }

    #[test]
    fn public_input_strings() {
        let input = vec![Fr::from(1u64), Fr::from(3u64)];
        let json = public_input_to_json(&input);
        assert_eq!(json, vec!["1".to_string(), "3".to_string()]);
        assert_eq!(public_input_from_json(&json).unwrap(), input);
        assert!(public_input_from_json(&["-1".to_string()]).is_err());
    }
}
