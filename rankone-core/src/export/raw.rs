//! Fixed-layout byte encoding of BN254 keys and proofs.
//!
//! Every field element is a 32-byte big-endian word. G1 points are `x ‖ y`, G2 points are
//! `x.c1 ‖ x.c0 ‖ y.c1 ‖ y.c0` (the order the EVM pairing precompile reads), and the point at
//! infinity is all zeros. Vectors carry a `u32` big-endian element count.

use ark_bn254::{g1, g2, Bn254, Fq, Fq2, Fr, G1Affine, G2Affine};
use ark_ec::short_weierstrass::Affine;
use common::constants::{FIELD_ELEMENT_BYTES, LENGTH_PREFIX_BYTES};
use common::field_conversion::{ark_to_be_bytes, be_bytes_to_ark};

use crate::groth16::{Proof, ProvingKey, QapConstraints, VerifyingKey};
use crate::r1cs::SparseMatrix;
use crate::utils::errors::ArtifactError;

pub const G1_RAW_SIZE: usize = 2 * FIELD_ELEMENT_BYTES;
pub const G2_RAW_SIZE: usize = 4 * FIELD_ELEMENT_BYTES;
/// `A ‖ B ‖ C`
pub const PROOF_RAW_SIZE: usize = 2 * G1_RAW_SIZE + G2_RAW_SIZE;

pub trait RawEncoding: Sized {
    fn write_raw(&self, out: &mut Vec<u8>);

    fn read_raw(reader: &mut RawReader<'_>) -> Result<Self, ArtifactError>;

    fn to_raw_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.write_raw(&mut out);
        out
    }

    /// Decodes exactly one value; leftover bytes are an error.
    fn from_raw_bytes(bytes: &[u8]) -> Result<Self, ArtifactError> {
        let mut reader = RawReader::new(bytes);
        let value = Self::read_raw(&mut reader)?;
        reader.finish()?;
        Ok(value)
    }
}

pub struct RawReader<'a> {
    bytes: &'a [u8],
}

impl<'a> RawReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], ArtifactError> {
        if n > self.bytes.len() {
            return Err(ArtifactError::Truncated {
                needed: n,
                remaining: self.bytes.len(),
            });
        }
        let (head, tail) = self.bytes.split_at(n);
        self.bytes = tail;
        Ok(head)
    }

    fn read_word(&mut self) -> Result<[u8; FIELD_ELEMENT_BYTES], ArtifactError> {
        let mut word = [0u8; FIELD_ELEMENT_BYTES];
        word.copy_from_slice(self.take(FIELD_ELEMENT_BYTES)?);
        Ok(word)
    }

    fn read_len(&mut self) -> Result<usize, ArtifactError> {
        let mut prefix = [0u8; LENGTH_PREFIX_BYTES];
        prefix.copy_from_slice(self.take(LENGTH_PREFIX_BYTES)?);
        Ok(u32::from_be_bytes(prefix) as usize)
    }

    fn finish(self) -> Result<(), ArtifactError> {
        match self.bytes.len() {
            0 => Ok(()),
            n => Err(ArtifactError::TrailingBytes(n)),
        }
    }
}

fn write_len(out: &mut Vec<u8>, len: usize) {
    debug_assert!(len <= u32::MAX as usize);
    out.extend_from_slice(&(len as u32).to_be_bytes());
}

impl RawEncoding for Fr {
    fn write_raw(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&ark_to_be_bytes(self));
    }

    fn read_raw(reader: &mut RawReader<'_>) -> Result<Self, ArtifactError> {
        be_bytes_to_ark(&reader.read_word()?).ok_or(ArtifactError::NonCanonicalFieldElement)
    }
}

impl RawEncoding for Fq {
    fn write_raw(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&ark_to_be_bytes(self));
    }

    fn read_raw(reader: &mut RawReader<'_>) -> Result<Self, ArtifactError> {
        be_bytes_to_ark(&reader.read_word()?).ok_or(ArtifactError::NonCanonicalFieldElement)
    }
}

impl RawEncoding for Fq2 {
    fn write_raw(&self, out: &mut Vec<u8>) {
        self.c1.write_raw(out);
        self.c0.write_raw(out);
    }

    fn read_raw(reader: &mut RawReader<'_>) -> Result<Self, ArtifactError> {
        let c1 = Fq::read_raw(reader)?;
        let c0 = Fq::read_raw(reader)?;
        Ok(Fq2::new(c0, c1))
    }
}

// Implemented on the concrete curve configs: the `G1Affine`/`G2Affine` aliases go through
// `BnConfig` projections that coherence cannot tell apart.
impl RawEncoding for Affine<g1::Config> {
    fn write_raw(&self, out: &mut Vec<u8>) {
        if self.infinity {
            out.extend_from_slice(&[0u8; G1_RAW_SIZE]);
        } else {
            self.x.write_raw(out);
            self.y.write_raw(out);
        }
    }

    fn read_raw(reader: &mut RawReader<'_>) -> Result<Self, ArtifactError> {
        let x = Fq::read_raw(reader)?;
        let y = Fq::read_raw(reader)?;
        if x == Fq::from(0u64) && y == Fq::from(0u64) {
            return Ok(G1Affine::identity());
        }
        let point = G1Affine::new_unchecked(x, y);
        if point.is_on_curve() && point.is_in_correct_subgroup_assuming_on_curve() {
            Ok(point)
        } else {
            Err(ArtifactError::InvalidPoint("G1"))
        }
    }
}

impl RawEncoding for Affine<g2::Config> {
    fn write_raw(&self, out: &mut Vec<u8>) {
        if self.infinity {
            out.extend_from_slice(&[0u8; G2_RAW_SIZE]);
        } else {
            self.x.write_raw(out);
            self.y.write_raw(out);
        }
    }

    fn read_raw(reader: &mut RawReader<'_>) -> Result<Self, ArtifactError> {
        let x = Fq2::read_raw(reader)?;
        let y = Fq2::read_raw(reader)?;
        if x == Fq2::from(0u64) && y == Fq2::from(0u64) {
            return Ok(G2Affine::identity());
        }
        let point = G2Affine::new_unchecked(x, y);
        if point.is_on_curve() && point.is_in_correct_subgroup_assuming_on_curve() {
            Ok(point)
        } else {
            Err(ArtifactError::InvalidPoint("G2"))
        }
    }
}

impl<T: RawEncoding> RawEncoding for Vec<T> {
    fn write_raw(&self, out: &mut Vec<u8>) {
        write_len(out, self.len());
        self.iter().for_each(|item| item.write_raw(out));
    }

    fn read_raw(reader: &mut RawReader<'_>) -> Result<Self, ArtifactError> {
        let len = reader.read_len()?;
        (0..len).map(|_| T::read_raw(reader)).collect()
    }
}

impl RawEncoding for Proof<Bn254> {
    fn write_raw(&self, out: &mut Vec<u8>) {
        self.a.write_raw(out);
        self.b.write_raw(out);
        self.c.write_raw(out);
    }

    fn read_raw(reader: &mut RawReader<'_>) -> Result<Self, ArtifactError> {
        Ok(Proof {
            a: G1Affine::read_raw(reader)?,
            b: G2Affine::read_raw(reader)?,
            c: G1Affine::read_raw(reader)?,
        })
    }
}

impl RawEncoding for VerifyingKey<Bn254> {
    fn write_raw(&self, out: &mut Vec<u8>) {
        self.alpha_g1.write_raw(out);
        self.beta_g2.write_raw(out);
        self.gamma_g2.write_raw(out);
        self.delta_g2.write_raw(out);
        self.gamma_abc_g1.write_raw(out);
    }

    fn read_raw(reader: &mut RawReader<'_>) -> Result<Self, ArtifactError> {
        Ok(VerifyingKey {
            alpha_g1: G1Affine::read_raw(reader)?,
            beta_g2: G2Affine::read_raw(reader)?,
            gamma_g2: G2Affine::read_raw(reader)?,
            delta_g2: G2Affine::read_raw(reader)?,
            gamma_abc_g1: Vec::read_raw(reader)?,
        })
    }
}

/// `num_cols ‖ num_rows ‖ rows`, each row `count ‖ (column u32, coefficient)*`.
impl RawEncoding for SparseMatrix<Fr> {
    fn write_raw(&self, out: &mut Vec<u8>) {
        write_len(out, self.num_cols);
        write_len(out, self.rows.len());
        for row in &self.rows {
            write_len(out, row.len());
            for (col, coeff) in row {
                write_len(out, *col);
                coeff.write_raw(out);
            }
        }
    }

    fn read_raw(reader: &mut RawReader<'_>) -> Result<Self, ArtifactError> {
        let num_cols = reader.read_len()?;
        let num_rows = reader.read_len()?;
        let rows = (0..num_rows)
            .map(|_| {
                let len = reader.read_len()?;
                (0..len)
                    .map(|_| Ok((reader.read_len()?, Fr::read_raw(reader)?)))
                    .collect::<Result<Vec<_>, ArtifactError>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(SparseMatrix { rows, num_cols })
    }
}

impl RawEncoding for QapConstraints<Fr> {
    fn write_raw(&self, out: &mut Vec<u8>) {
        write_len(out, self.num_inputs);
        self.a.write_raw(out);
        self.b.write_raw(out);
        self.c.write_raw(out);
    }

    fn read_raw(reader: &mut RawReader<'_>) -> Result<Self, ArtifactError> {
        Ok(QapConstraints {
            num_inputs: reader.read_len()?,
            a: SparseMatrix::read_raw(reader)?,
            b: SparseMatrix::read_raw(reader)?,
            c: SparseMatrix::read_raw(reader)?,
        })
    }
}

impl RawEncoding for ProvingKey<Bn254> {
    fn write_raw(&self, out: &mut Vec<u8>) {
        self.vk.write_raw(out);
        self.beta_g1.write_raw(out);
        self.delta_g1.write_raw(out);
        self.a_query.write_raw(out);
        self.b_g1_query.write_raw(out);
        self.b_g2_query.write_raw(out);
        self.h_query.write_raw(out);
        self.l_query.write_raw(out);
        self.constraints.write_raw(out);
    }

    fn read_raw(reader: &mut RawReader<'_>) -> Result<Self, ArtifactError> {
        Ok(ProvingKey {
            vk: VerifyingKey::read_raw(reader)?,
            beta_g1: G1Affine::read_raw(reader)?,
            delta_g1: G1Affine::read_raw(reader)?,
            a_query: Vec::read_raw(reader)?,
            b_g1_query: Vec::read_raw(reader)?,
            b_g2_query: Vec::read_raw(reader)?,
            h_query: Vec::read_raw(reader)?,
            l_query: Vec::read_raw(reader)?,
            constraints: QapConstraints::read_raw(reader)?,
        })
    }
}
