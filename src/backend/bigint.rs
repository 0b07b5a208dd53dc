//! Radix-2^58 big-integer primitives for the scalar field.
//!
//! Values are stored as signed 64-bit limbs in base 2^58, which leaves six
//! spare bits per limb for carries accumulated by deferred-reduction
//! arithmetic. The modulus and every derived constant (its predecessor, the
//! Barrett reciprocal) are computed from the canonical 48-byte big-endian
//! encoding of the scalar-field order, so the limb split never has to be
//! written out by hand.
//!
//! Everything here operates on plain limb arrays; range bookkeeping and the
//! decision of *when* to reduce live one layer up in [`crate::scalar`].

use rand_core::RngCore;

/// Bits per limb.
pub(crate) const BASE_BITS: usize = 58;
/// Limbs in a single-width value (covers the 384-bit serialized form).
pub(crate) const NLIMBS: usize = 7;
/// Limbs in a double-width (product) value.
pub(crate) const NLIMBS2: usize = 2 * NLIMBS;
/// Mask selecting the canonical bits of one limb.
pub(crate) const BASE_MASK: i64 = (1i64 << BASE_BITS) - 1;
/// Canonical bit count of the single-width head limb.
pub(crate) const HEAD_BITS: usize = 384 - (NLIMBS - 1) * BASE_BITS;
/// Canonical bit count of the double-width head limb.
pub(crate) const HEAD_BITS2: usize = 768 - (NLIMBS2 - 1) * BASE_BITS;

/// Serialized width of a field element.
pub(crate) const SCALAR_BYTES: usize = 48;

pub(crate) type Big = [i64; NLIMBS];
pub(crate) type DBig = [i64; NLIMBS2];

/// Order of the BLS12-381 scalar field, big-endian.
const MODULUS_BE: [u8; SCALAR_BYTES] = [
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x73, 0xed, 0xa7, 0x53, 0x29, 0x9d, 0x7d, 0x48, 0x33, 0x39, 0xd8, 0x08, 0x09, 0xa1,
    0xd8, 0x05, 0x53, 0xbd, 0xa4, 0x02, 0xff, 0xfe, 0x5b, 0xfe, 0xff, 0xff, 0xff, 0xff, 0x00,
    0x00, 0x00, 0x01,
];

/// The scalar-field modulus `p` in limb form.
pub(crate) const P: Big = from_bytes48(&MODULUS_BE);

/// `p - 1`, the sampling bound for nonzero elements.
pub(crate) const P_MINUS_1: Big = {
    let mut p = P;
    // p is odd, so the low limb cannot borrow
    p[0] -= 1;
    p
};

pub(crate) const ZERO: Big = [0; NLIMBS];
pub(crate) const ONE: Big = {
    let mut one = ZERO;
    one[0] = 1;
    one
};

/// Every in-envelope single-width value is below `2^BARRETT_SHIFT`: the head
/// limb is bounded by `2^63` at weight `2^((NLIMBS-1) * BASE_BITS)`.
pub(crate) const BARRETT_SHIFT: usize = 63 + (NLIMBS - 1) * BASE_BITS;

/// Barrett reciprocal `floor(2^BARRETT_SHIFT / p)`.
///
/// With this shift the quotient estimate undershoots by at most one, so a
/// single conditional subtraction always lands in `[0, p)`.
pub(crate) const MU: Big = barrett_mu();

const fn from_bytes48(bytes: &[u8; SCALAR_BYTES]) -> Big {
    let mut limbs = ZERO;
    let mut bit = 0;
    while bit < 8 * SCALAR_BYTES {
        let byte = bytes[SCALAR_BYTES - 1 - bit / 8];
        if (byte >> (bit % 8)) & 1 == 1 {
            limbs[bit / BASE_BITS] |= 1i64 << (bit % BASE_BITS);
        }
        bit += 1;
    }
    limbs
}

const fn const_comp(a: &Big, b: &Big) -> i32 {
    let mut i = NLIMBS;
    while i > 0 {
        i -= 1;
        if a[i] > b[i] {
            return 1;
        }
        if a[i] < b[i] {
            return -1;
        }
    }
    0
}

const fn const_sub(mut a: Big, b: &Big) -> Big {
    let mut borrow = 0;
    let mut i = 0;
    while i < NLIMBS {
        let d = a[i] - b[i] - borrow;
        if d < 0 {
            a[i] = d + (1i64 << BASE_BITS);
            borrow = 1;
        } else {
            a[i] = d;
            borrow = 0;
        }
        i += 1;
    }
    a
}

const fn const_shl1(mut a: Big) -> Big {
    let mut i = NLIMBS;
    while i > 1 {
        i -= 1;
        a[i] = ((a[i] << 1) | (a[i - 1] >> (BASE_BITS - 1))) & BASE_MASK;
    }
    a[0] = (a[0] << 1) & BASE_MASK;
    a
}

/// Restoring division of `2^BARRETT_SHIFT` by `p`.
const fn barrett_mu() -> Big {
    let mut quotient = ZERO;
    let mut rem = ZERO;
    let mut i = BARRETT_SHIFT + 1;
    while i > 0 {
        i -= 1;
        rem = const_shl1(rem);
        if i == BARRETT_SHIFT {
            rem[0] |= 1;
        }
        if const_comp(&rem, &P) >= 0 {
            rem = const_sub(rem, &P);
            quotient[i / BASE_BITS] |= 1i64 << (i % BASE_BITS);
        }
    }
    quotient
}

/// Carry-propagates `x`, leaving every limb but the head in `[0, 2^58)`.
/// The head limb absorbs the final carry unmasked.
pub(crate) fn norm(x: &mut Big) {
    let mut carry = 0i64;
    for limb in x.iter_mut().take(NLIMBS - 1) {
        let d = *limb + carry;
        *limb = d & BASE_MASK;
        carry = d >> BASE_BITS;
    }
    x[NLIMBS - 1] += carry;
}

pub(crate) fn dnorm(x: &mut DBig) {
    let mut carry = 0i64;
    for limb in x.iter_mut().take(NLIMBS2 - 1) {
        let d = *limb + carry;
        *limb = d & BASE_MASK;
        carry = d >> BASE_BITS;
    }
    x[NLIMBS2 - 1] += carry;
}

/// Compares two carry-propagated nonnegative values.
pub(crate) fn comp(a: &Big, b: &Big) -> i32 {
    const_comp(a, b)
}

pub(crate) fn is_zero(a: &Big) -> bool {
    a.iter().all(|&l| l == 0)
}

fn is_one(a: &Big) -> bool {
    a[0] == 1 && a[1..].iter().all(|&l| l == 0)
}

/// Schoolbook product with column accumulation in 128 bits. Operands must be
/// nonnegative with all but the head limb carry-propagated; the result has
/// every limb but the head in `[0, 2^58)`.
pub(crate) fn mul(a: &Big, b: &Big) -> DBig {
    let mut out = [0i64; NLIMBS2];
    let mut carry: i128 = 0;
    for k in 0..NLIMBS2 - 1 {
        let mut acc = carry;
        let lo = if k >= NLIMBS { k - NLIMBS + 1 } else { 0 };
        let hi = if k < NLIMBS { k } else { NLIMBS - 1 };
        for i in lo..=hi {
            acc += a[i] as i128 * b[k - i] as i128;
        }
        out[k] = (acc & BASE_MASK as i128) as i64;
        carry = acc >> BASE_BITS;
    }
    out[NLIMBS2 - 1] = carry as i64;
    out
}

fn embed(x: &Big) -> DBig {
    let mut out = [0i64; NLIMBS2];
    out[..NLIMBS].copy_from_slice(x);
    out
}

/// `floor(d / 2^k)` for a carry-propagated `d`; the result must fit a single
/// width.
fn shr_to_single(d: &DBig, k: usize) -> Big {
    let limb = k / BASE_BITS;
    let off = (k % BASE_BITS) as u32;
    let mut out = ZERO;
    for (i, slot) in out.iter_mut().enumerate() {
        let idx = limb + i;
        let lo = if idx < NLIMBS2 { (d[idx] as i128) >> off } else { 0 };
        let hi = if off > 0 && idx + 1 < NLIMBS2 {
            (d[idx + 1] as i128) << (BASE_BITS as u32 - off)
        } else {
            0
        };
        *slot = ((lo | hi) & BASE_MASK as i128) as i64;
    }
    out
}

/// Barrett reduction of a nonnegative single-width value below
/// `2^BARRETT_SHIFT` to its canonical representative in `[0, p)`.
pub(crate) fn reduce(x: &Big) -> Big {
    let prod = mul(x, &MU);
    let q = shr_to_single(&prod, BARRETT_SHIFT);
    let qp = mul(&q, &P);

    let mut rem = embed(x);
    for (r, s) in rem.iter_mut().zip(qp.iter()) {
        *r -= s;
    }
    dnorm(&mut rem);

    let mut out = ZERO;
    out.copy_from_slice(&rem[..NLIMBS]);
    if comp(&out, &P) >= 0 {
        sub_assign(&mut out, &P);
    }
    out
}

const WLIMBS: usize = NLIMBS2 + 1;

fn wcomp(a: &[i64; WLIMBS], b: &[i64; WLIMBS]) -> i32 {
    for i in (0..WLIMBS).rev() {
        if a[i] > b[i] {
            return 1;
        }
        if a[i] < b[i] {
            return -1;
        }
    }
    0
}

fn wshl1(a: &mut [i64; WLIMBS]) {
    for i in (1..WLIMBS).rev() {
        a[i] = ((a[i] << 1) | (a[i - 1] >> (BASE_BITS - 1))) & BASE_MASK;
    }
    a[0] = (a[0] << 1) & BASE_MASK;
}

fn wshr1(a: &mut [i64; WLIMBS]) {
    for i in 0..WLIMBS - 1 {
        a[i] = (a[i] >> 1) | ((a[i + 1] & 1) << (BASE_BITS - 1));
    }
    a[WLIMBS - 1] >>= 1;
}

fn wsub(a: &mut [i64; WLIMBS], b: &[i64; WLIMBS]) {
    let mut borrow = 0;
    for i in 0..WLIMBS {
        let d = a[i] - b[i] - borrow;
        if d < 0 {
            a[i] = d + (1i64 << BASE_BITS);
            borrow = 1;
        } else {
            a[i] = d;
            borrow = 0;
        }
    }
}

/// Shift-and-subtract reduction of a double-width value modulo `m`.
pub(crate) fn dmod(d: &DBig, m: &Big) -> Big {
    // one limb of headroom so the trial modulus can overshoot the input
    let mut x = [0i64; WLIMBS];
    let mut dd = *d;
    dnorm(&mut dd);
    x[..NLIMBS2 - 1].copy_from_slice(&dd[..NLIMBS2 - 1]);
    x[NLIMBS2 - 1] = dd[NLIMBS2 - 1] & BASE_MASK;
    x[NLIMBS2] = dd[NLIMBS2 - 1] >> BASE_BITS;

    let mut trial = [0i64; WLIMBS];
    trial[..NLIMBS].copy_from_slice(m);

    let mut shifts = 0usize;
    while wcomp(&trial, &x) <= 0 {
        wshl1(&mut trial);
        shifts += 1;
    }
    while shifts > 0 {
        wshr1(&mut trial);
        shifts -= 1;
        if wcomp(&x, &trial) >= 0 {
            wsub(&mut x, &trial);
        }
    }

    let mut out = ZERO;
    out.copy_from_slice(&x[..NLIMBS]);
    out
}

fn add_assign(a: &mut Big, b: &Big) {
    for (x, y) in a.iter_mut().zip(b.iter()) {
        *x += y;
    }
    norm(a);
}

/// `a -= b` for canonical `a >= b`.
fn sub_assign(a: &mut Big, b: &Big) {
    for (x, y) in a.iter_mut().zip(b.iter()) {
        *x -= y;
    }
    norm(a);
}

/// Canonical complement: `0` maps to `0`, anything else to `p - x`.
pub(crate) fn modneg(x: &Big) -> Big {
    if is_zero(x) {
        return ZERO;
    }
    let mut out = P;
    sub_assign(&mut out, x);
    out
}

/// Halves a canonical even-or-odd value (the caller makes it even first).
fn half(x: &mut Big) {
    for i in 0..NLIMBS - 1 {
        x[i] = (x[i] >> 1) | ((x[i + 1] & 1) << (BASE_BITS - 1));
    }
    x[NLIMBS - 1] >>= 1;
}

fn half_mod(x: &mut Big) {
    if x[0] & 1 == 1 {
        add_assign(x, &P);
    }
    half(x);
}

fn mod_sub_assign(a: &mut Big, b: &Big) {
    if comp(a, b) < 0 {
        add_assign(a, &P);
    }
    sub_assign(a, b);
}

/// Binary extended Euclid for a canonical nonzero `a`, returning
/// `a^-1 mod p`.
pub(crate) fn invmodp(a: &Big) -> Big {
    let mut u = *a;
    let mut v = P;
    let mut x1 = ONE;
    let mut x2 = ZERO;
    while !is_one(&u) && !is_one(&v) {
        while u[0] & 1 == 0 {
            half(&mut u);
            half_mod(&mut x1);
        }
        while v[0] & 1 == 0 {
            half(&mut v);
            half_mod(&mut x2);
        }
        if comp(&u, &v) >= 0 {
            sub_assign(&mut u, &v);
            mod_sub_assign(&mut x1, &x2);
        } else {
            sub_assign(&mut v, &u);
            mod_sub_assign(&mut x2, &x1);
        }
    }
    if is_one(&u) {
        x1
    } else {
        x2
    }
}

/// `x += v` for a small nonnegative `v` on a canonical value.
pub(crate) fn inc(x: &mut Big, v: i64) {
    x[0] += v;
    norm(x);
}

pub(crate) fn parse_bytes48(bytes: &[u8; SCALAR_BYTES]) -> Big {
    from_bytes48(bytes)
}

pub(crate) fn to_bytes48(x: &Big) -> [u8; SCALAR_BYTES] {
    let mut out = [0u8; SCALAR_BYTES];
    for bit in 0..8 * SCALAR_BYTES {
        if (x[bit / BASE_BITS] >> (bit % BASE_BITS)) & 1 == 1 {
            out[SCALAR_BYTES - 1 - bit / 8] |= 1 << (bit % 8);
        }
    }
    out
}

/// Loads 64 big-endian bytes into a double-width value, for reduction of
/// wide uniform input (hash-to-field, sampling).
pub(crate) fn from_bytes_wide(bytes: &[u8; 64]) -> DBig {
    let mut limbs = [0i64; NLIMBS2];
    let mut bit = 0;
    while bit < 512 {
        let byte = bytes[63 - bit / 8];
        if (byte >> (bit % 8)) & 1 == 1 {
            limbs[bit / BASE_BITS] |= 1i64 << (bit % BASE_BITS);
        }
        bit += 1;
    }
    limbs
}

/// Uniform value in `[0, m)` from 512 bits of rng output reduced mod `m`.
pub(crate) fn random_below<R: RngCore + ?Sized>(rng: &mut R, m: &Big) -> Big {
    let mut buf = [0u8; 64];
    rng.fill_bytes(&mut buf);
    dmod(&from_bytes_wide(&buf), m)
}

/// Little-endian 64-bit words of a canonical value, as the curve backend's
/// scalar representation expects.
pub(crate) fn to_u64x4(x: &Big) -> [u64; 4] {
    let mut out = [0u64; 4];
    let mut acc: u128 = 0;
    let mut acc_bits = 0u32;
    let mut word = 0usize;
    for &limb in x.iter() {
        acc |= (limb as u128) << acc_bits;
        acc_bits += BASE_BITS as u32;
        while acc_bits >= 64 && word < 4 {
            out[word] = acc as u64;
            acc >>= 64;
            acc_bits -= 64;
            word += 1;
        }
    }
    if word < 4 {
        out[word] = acc as u64;
    }
    out
}
