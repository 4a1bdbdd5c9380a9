use ark_bn254::{Bn254, G1Affine, G2Affine};
use common::field_conversion::ark_to_decimal;
use std::fmt::Write;

use crate::groth16::VerifyingKey;

/// BN254 base field modulus.
pub const BASE_FIELD_MODULUS: &str =
    "21888242871839275222246405745257275088696311157297823662689037894645226208583";
/// BN254 scalar field modulus; public inputs must be below it.
pub const SCALAR_FIELD_MODULUS: &str =
    "21888242871839275222246405745257275088548364400416034343698204186575808495617";

fn g1_words(p: &G1Affine) -> [String; 2] {
    if p.infinity {
        return ["0".to_string(), "0".to_string()];
    }
    [ark_to_decimal(&p.x), ark_to_decimal(&p.y)]
}

/// `[x1, x0, y1, y0]`, the precompile's word order.
fn g2_words(p: &G2Affine) -> [String; 4] {
    if p.infinity {
        return ["0", "0", "0", "0"].map(String::from);
    }
    [
        ark_to_decimal(&p.x.c1),
        ark_to_decimal(&p.x.c0),
        ark_to_decimal(&p.y.c1),
        ark_to_decimal(&p.y.c0),
    ]
}

/// Renders a standalone Solidity contract that checks proofs against `vk`.
///
/// `verifyProof(a, b, c, input)` takes the proof in the `proof.json` layout and the public
/// inputs in declaration order. The pairing check runs on the `0x06`, `0x07` and `0x08`
/// precompiles.
pub fn export_solidity(vk: &VerifyingKey<Bn254>) -> String {
    let mut out = String::new();
    render(vk, &mut out).expect("writing to a String is infallible");
    out
}

fn render(vk: &VerifyingKey<Bn254>, out: &mut String) -> std::fmt::Result {
    let [alpha_x, alpha_y] = g1_words(&vk.alpha_g1);

    writeln!(out, "// SPDX-License-Identifier: MIT")?;
    writeln!(out, "pragma solidity ^0.8.0;")?;
    writeln!(out)?;
    writeln!(out, "/// Groth16 verifier over BN254.")?;
    writeln!(out, "contract Verifier {{")?;
    writeln!(out, "    uint256 constant PRIME_Q = {BASE_FIELD_MODULUS};")?;
    writeln!(out, "    uint256 constant SNARK_SCALAR_FIELD = {SCALAR_FIELD_MODULUS};")?;
    writeln!(out)?;
    writeln!(out, "    uint256 constant ALPHA_X = {alpha_x};")?;
    writeln!(out, "    uint256 constant ALPHA_Y = {alpha_y};")?;
    for (name, point) in [
        ("BETA", &vk.beta_g2),
        ("GAMMA", &vk.gamma_g2),
        ("DELTA", &vk.delta_g2),
    ] {
        let [x1, x0, y1, y0] = g2_words(point);
        writeln!(out, "    uint256 constant {name}_X1 = {x1};")?;
        writeln!(out, "    uint256 constant {name}_X0 = {x0};")?;
        writeln!(out, "    uint256 constant {name}_Y1 = {y1};")?;
        writeln!(out, "    uint256 constant {name}_Y0 = {y0};")?;
    }
    writeln!(out)?;
    writeln!(
        out,
        "    uint256 constant IC_LENGTH = {};",
        vk.gamma_abc_g1.len()
    )?;
    writeln!(out)?;

    writeln!(
        out,
        "    function ic(uint256 i) internal pure returns (uint256 x, uint256 y) {{"
    )?;
    for (i, point) in vk.gamma_abc_g1.iter().enumerate() {
        let [x, y] = g1_words(point);
        writeln!(out, "        if (i == {i}) return ({x}, {y});")?;
    }
    writeln!(out, "        revert(\"verifier-ic-index\");")?;
    writeln!(out, "    }}")?;
    writeln!(out)?;

    out.push_str(VERIFY_BODY);
    writeln!(out, "}}")?;
    Ok(())
}

const VERIFY_BODY: &str = r#"    function verifyProof(
        uint256[2] calldata a,
        uint256[2][2] calldata b,
        uint256[2] calldata c,
        uint256[] calldata input
    ) public view returns (bool) {
        require(input.length + 1 == IC_LENGTH, "verifier-bad-input");

        (uint256 vkX, uint256 vkY) = ic(0);
        for (uint256 i = 0; i < input.length; i++) {
            require(input[i] < SNARK_SCALAR_FIELD, "verifier-gte-snark-scalar-field");
            (uint256 x, uint256 y) = ic(i + 1);
            (x, y) = ecMul(x, y, input[i]);
            (vkX, vkY) = ecAdd(vkX, vkY, x, y);
        }

        // e(-A, B) * e(alpha, beta) * e(vk_x, gamma) * e(C, delta) == 1
        uint256[24] memory p;
        p[0] = a[0];
        p[1] = (PRIME_Q - (a[1] % PRIME_Q)) % PRIME_Q;
        p[2] = b[0][0];
        p[3] = b[0][1];
        p[4] = b[1][0];
        p[5] = b[1][1];
        p[6] = ALPHA_X;
        p[7] = ALPHA_Y;
        p[8] = BETA_X1;
        p[9] = BETA_X0;
        p[10] = BETA_Y1;
        p[11] = BETA_Y0;
        p[12] = vkX;
        p[13] = vkY;
        p[14] = GAMMA_X1;
        p[15] = GAMMA_X0;
        p[16] = GAMMA_Y1;
        p[17] = GAMMA_Y0;
        p[18] = c[0];
        p[19] = c[1];
        p[20] = DELTA_X1;
        p[21] = DELTA_X0;
        p[22] = DELTA_Y1;
        p[23] = DELTA_Y0;

        uint256[1] memory result;
        bool success;
        assembly {
            success := staticcall(gas(), 0x08, p, 768, result, 0x20)
        }
        require(success, "verifier-pairing-failed");
        return result[0] == 1;
    }

    function ecAdd(uint256 x1, uint256 y1, uint256 x2, uint256 y2)
        internal
        view
        returns (uint256, uint256)
    {
        uint256[4] memory input = [x1, y1, x2, y2];
        uint256[2] memory r;
        bool success;
        assembly {
            success := staticcall(gas(), 0x06, input, 0x80, r, 0x40)
        }
        require(success, "verifier-ec-add-failed");
        return (r[0], r[1]);
    }

    function ecMul(uint256 x, uint256 y, uint256 s)
        internal
        view
        returns (uint256, uint256)
    {
        uint256[3] memory input = [x, y, s];
        uint256[2] memory r;
        bool success;
        assembly {
            success := staticcall(gas(), 0x07, input, 0x60, r, 0x40)
        }
        require(success, "verifier-ec-mul-failed");
        return (r[0], r[1]);
    }
"#;
