//! Versioned key and proof files.
//!
//! A file is `MAGIC ‖ version (u16 BE) ‖ artifact tag (u8)` followed by the body. Writes are
//! atomic: a failed save never leaves a partial file behind.

use ark_bn254::Bn254;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use common::constants::{ArtifactKind, FORMAT_VERSION, HEADER_LEN, MAGIC};
use common::serializable::{read_file, write_atomic, Serializable};
use std::path::Path;

use super::raw::RawEncoding;
use crate::groth16::{Proof, ProvingKey, VerifyingKey};
use crate::utils::errors::ArtifactError;

pub trait Artifact: RawEncoding {
    const KIND: ArtifactKind;
}

impl Artifact for ProvingKey<Bn254> {
    const KIND: ArtifactKind = ArtifactKind::ProvingKey;
}

impl Artifact for VerifyingKey<Bn254> {
    const KIND: ArtifactKind = ArtifactKind::VerifyingKey;
}

impl Artifact for Proof<Bn254> {
    const KIND: ArtifactKind = ArtifactKind::Proof;
}

fn header(kind: ArtifactKind) -> Vec<u8> {
    let mut out = Vec::with_capacity(HEADER_LEN);
    out.extend_from_slice(&MAGIC);
    out.extend_from_slice(&FORMAT_VERSION.to_be_bytes());
    out.push(kind.tag());
    out
}

/// Checks the header and returns the body that follows it.
fn strip_header(bytes: &[u8], expected: ArtifactKind) -> Result<&[u8], ArtifactError> {
    if bytes.len() < HEADER_LEN || bytes[..MAGIC.len()] != MAGIC {
        return Err(ArtifactError::BadMagic);
    }
    let version = u16::from_be_bytes([bytes[MAGIC.len()], bytes[MAGIC.len() + 1]]);
    if version != FORMAT_VERSION {
        return Err(ArtifactError::UnsupportedVersion(version));
    }
    let tag = bytes[HEADER_LEN - 1];
    if tag != expected.tag() {
        return Err(ArtifactError::UnexpectedArtifact {
            expected: expected.tag(),
            got: tag,
        });
    }
    Ok(&bytes[HEADER_LEN..])
}

pub fn encode_artifact<T: Artifact>(value: &T) -> Vec<u8> {
    let mut out = header(T::KIND);
    value.write_raw(&mut out);
    out
}

pub fn decode_artifact<T: Artifact>(bytes: &[u8]) -> Result<T, ArtifactError> {
    T::from_raw_bytes(strip_header(bytes, T::KIND)?)
}

#[tracing::instrument(skip_all, fields(path = %path.display(), kind = ?T::KIND))]
pub fn save<T: Artifact>(value: &T, path: &Path) -> Result<(), ArtifactError> {
    let bytes = encode_artifact(value);
    write_atomic(path, &bytes)?;
    tracing::debug!(len = bytes.len(), "artifact written");
    Ok(())
}

#[tracing::instrument(skip_all, fields(path = %path.display(), kind = ?T::KIND))]
pub fn load<T: Artifact>(path: &Path) -> Result<T, ArtifactError> {
    decode_artifact(&read_file(path)?)
}

/// Same header, with the body in arkworks' compressed canonical form. Roughly halves the size
/// of a proving key; only readable by arkworks-based tooling.
pub fn save_compressed<T>(value: &T, path: &Path) -> Result<(), ArtifactError>
where
    T: Artifact + CanonicalSerialize,
{
    let mut bytes = header(T::KIND);
    value.serialize_compressed(&mut bytes)?;
    write_atomic(path, &bytes)?;
    Ok(())
}

pub fn load_compressed<T>(path: &Path) -> Result<T, ArtifactError>
where
    T: Artifact + CanonicalDeserialize,
{
    let bytes = read_file(path)?;
    let mut body = strip_header(&bytes, T::KIND)?;
    let value = T::deserialize_compressed(&mut body)?;
    if !body.is_empty() {
        return Err(ArtifactError::TrailingBytes(body.len()));
    }
    Ok(value)
}

pub fn save_json<T: serde::Serialize + serde::de::DeserializeOwned>(
    value: &T,
    path: &Path,
) -> Result<(), ArtifactError> {
    Ok(value.serialize_to_file(path)?)
}

pub fn load_json<T: serde::Serialize + serde::de::DeserializeOwned>(
    path: &Path,
) -> Result<T, ArtifactError> {
    Ok(T::deserialize_from_file(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::groth16::{prove, setup, ToxicWaste};
    use crate::r1cs::{compile, generate_witness, CircuitDefinition, CompileConfig};
    use ark_bn254::Fr;
    use ark_std::rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use std::path::PathBuf;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir =
            std::env::temp_dir().join(format!("rankone-persist-{name}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn sum_artifacts() -> (ProvingKey<Bn254>, VerifyingKey<Bn254>, Proof<Bn254>) {
        let mut circuit = CircuitDefinition::new("sum");
        let a = circuit.public("A");
        let b = circuit.private("B");
        let sum = circuit.public("Sum");
        circuit.assert_equal(a + b, sum);
        let r1cs = compile(&circuit, &CompileConfig::reject_unconstrained()).unwrap();
        let (pk, vk) = setup::<Bn254>(&r1cs, ToxicWaste::from_seed([4u8; 32])).unwrap();
        let witness =
            generate_witness(&r1cs, &[Fr::from(1u64), Fr::from(3u64)], &[Fr::from(2u64)]).unwrap();
        let proof = prove(&pk, &witness, &mut ChaCha20Rng::seed_from_u64(4)).unwrap();
        (pk, vk, proof)
    }

    #[test]
    fn files_round_trip() {
        let dir = scratch_dir("round-trip");
        let (pk, vk, proof) = sum_artifacts();

        save(&pk, &dir.join("test.pk")).unwrap();
        save(&vk, &dir.join("test.vk")).unwrap();
        save(&proof, &dir.join("proof.bin")).unwrap();
        save_compressed(&pk, &dir.join("test.pk.ark")).unwrap();

        assert_eq!(load::<ProvingKey<Bn254>>(&dir.join("test.pk")).unwrap(), pk);
        assert_eq!(load::<VerifyingKey<Bn254>>(&dir.join("test.vk")).unwrap(), vk);
        assert_eq!(load::<Proof<Bn254>>(&dir.join("proof.bin")).unwrap(), proof);
        assert_eq!(
            load_compressed::<ProvingKey<Bn254>>(&dir.join("test.pk.ark")).unwrap(),
            pk
        );
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn header_is_checked() {
        let (_, vk, proof) = sum_artifacts();
        let bytes = encode_artifact(&vk);
        assert_eq!(bytes[..4], MAGIC);

        assert!(matches!(
            decode_artifact::<Proof<Bn254>>(&bytes),
            Err(ArtifactError::UnexpectedArtifact {
                expected: 3,
                got: 2
            })
        ));

        let mut future = encode_artifact(&proof);
        future[5] = 0xff;
        assert!(matches!(
            decode_artifact::<Proof<Bn254>>(&future),
            Err(ArtifactError::UnsupportedVersion(0x00ff))
        ));

        let mut foreign = encode_artifact(&proof);
        foreign[0] = b'X';
        assert!(matches!(
            decode_artifact::<Proof<Bn254>>(&foreign),
            Err(ArtifactError::BadMagic)
        ));
        assert!(matches!(
            decode_artifact::<Proof<Bn254>>(&[]),
            Err(ArtifactError::BadMagic)
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = scratch_dir("missing");
        assert!(matches!(
            load::<VerifyingKey<Bn254>>(&dir.join("absent.vk")),
            Err(ArtifactError::Io(_))
        ));
        std::fs::remove_dir_all(dir).unwrap();
    }
}
