//! CRC-32 checksum primitives: per-block computation and the combine
//! operation that reconstructs a whole-stream CRC from independently
//! computed block CRCs.
//!
//! Per-block `{init, update}` is not reimplemented here -- it is delegated
//! to [`flate2::Crc`], which wraps the same checksum implementation the
//! DEFLATE codec already links. `combine` has no equivalent in `flate2`
//! or in the general-purpose CRC crates in the wider ecosystem (gzip's CRC
//! combine is a narrow, format-specific operation), so it is implemented
//! here directly from the classic GF(2) polynomial-matrix-exponentiation
//! construction that zlib's own `crc32_combine` uses -- grounded in
//! `original_source/parallel.c`'s call to that same zlib function.

use flate2::Crc;

/// Compute the CRC-32 of `data`, matching the checksum used by gzip.
pub fn crc32(data: &[u8]) -> u32 {
    let mut crc = Crc::new();
    crc.update(data);
    crc.sum()
}

const GF2_DIM: usize = 32;

/// `vec` times `mat`, both representing GF(2) polynomials/matrices: the
/// standard bit-parallel CRC matrix multiply.
fn gf2_matrix_times(mat: &[u32; GF2_DIM], mut vec: u32) -> u32 {
    let mut sum = 0u32;
    let mut i = 0;
    while vec != 0 {
        if vec & 1 != 0 {
            sum ^= mat[i];
        }
        vec >>= 1;
        i += 1;
    }
    sum
}

/// `square = mat^2` over GF(2).
fn gf2_matrix_square(square: &mut [u32; GF2_DIM], mat: &[u32; GF2_DIM]) {
    for (n, slot) in square.iter_mut().enumerate() {
        *slot = gf2_matrix_times(mat, mat[n]);
    }
}

/// Given `crc_a = CRC32(A)`, `crc_b = CRC32(B)`, and `len_b = len(B)`,
/// return `CRC32(A || B)` in `O(log len_b)` time without ever looking at
/// the bytes of `A` or `B`.
///
/// This is the entire reason the writer can assemble a correct
/// whole-stream checksum while only ever seeing per-block CRCs and
/// lengths from the compression workers.
pub fn crc32_combine(crc_a: u32, crc_b: u32, mut len_b: u64) -> u32 {
    if len_b == 0 {
        return crc_a;
    }

    // `odd` starts as the matrix for "shift by one bit position" under the
    // reflected CRC-32 polynomial (0xedb88320).
    let mut odd = [0u32; GF2_DIM];
    odd[0] = 0xedb8_8320;
    let mut row = 1u32;
    for slot in odd.iter_mut().skip(1) {
        *slot = row;
        row <<= 1;
    }

    let mut even = [0u32; GF2_DIM];
    gf2_matrix_square(&mut even, &odd); // even = shift by 2 bits
    gf2_matrix_square(&mut odd, &even); // odd = shift by 4 bits

    let mut crc = crc_a;
    loop {
        gf2_matrix_square(&mut even, &odd); // even = shift by 2^k bits
        if len_b & 1 != 0 {
            crc = gf2_matrix_times(&even, crc);
        }
        len_b >>= 1;
        if len_b == 0 {
            break;
        }

        gf2_matrix_square(&mut odd, &even); // odd = shift by 2^(k+1) bits
        if len_b & 1 != 0 {
            crc = gf2_matrix_times(&odd, crc);
        }
        len_b >>= 1;
        if len_b == 0 {
            break;
        }
    }

    crc ^ crc_b
}
