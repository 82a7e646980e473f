//! End-to-end tests exercising the real arithmetic-coded LZMA path through
//! the public `decode_into`/`decoded_size` API, as opposed to the
//! uncompressed-chunk fixtures in `src/xz.rs`'s own unit tests.

mod support;

use support::encoder::{build_xz, lzma2_chunk, LzmaEncoder, Op, RangeEncoder};

fn encode_and_decode(lc: u32, lp: u32, pb: u32, ops: &[Op]) -> (Vec<u8>, Vec<u8>) {
    let mut encoder = LzmaEncoder::new(lc, lp, pb);
    let mut range_enc = RangeEncoder::new();
    let plain = encoder.encode(&mut range_enc, ops);
    let lzma_body = range_enc.finish();
    let chunk = lzma2_chunk(plain.len(), encoder.properties_byte(), &lzma_body);
    let xz = build_xz(&chunk, &plain);
    (xz, plain)
}

fn assert_round_trips(xz: &[u8], plain: &[u8]) {
    let size = mini_xz::decoded_size(xz).unwrap();
    assert_eq!(size, plain.len());
    let mut out = vec![0u8; size];
    let written = mini_xz::decode_into(xz, &mut out).unwrap();
    assert_eq!(written, plain.len());
    assert_eq!(&out[..written], plain);
}

#[test]
fn literal_only_stream_round_trips() {
    let text = b"the quick brown fox jumps over the lazy dog";
    let ops: Vec<Op> = text.iter().map(|b| Op::Literal(*b)).collect();
    let (xz, plain) = encode_and_decode(3, 0, 2, &ops);
    assert_round_trips(&xz, &plain);
}

#[test]
fn distance_one_run_round_trips() {
    // "a" then a long rep0 run via repeated short-rep ops (distance 1, each
    // copying a single byte), covering the overlap-safe copy path.
    let mut ops = vec![Op::Literal(b'a')];
    for _ in 0..200 {
        ops.push(Op::ShortRep);
    }
    let (xz, plain) = encode_and_decode(3, 0, 2, &ops);
    assert_eq!(plain.len(), 201);
    assert!(plain.iter().all(|&b| b == b'a'));
    assert_round_trips(&xz, &plain);
}

#[test]
fn output_may_exceed_declared_dict_size() {
    // `build_xz` always declares the smallest LZMA2 dictionary-size property
    // (4096 bytes). The dictionary size bounds how far back a match distance
    // may reach, not how much output a block may produce: a block built
    // entirely from distance-1 matches can legitimately decode to far more
    // than 4096 bytes, and must not be rejected for exceeding it.
    let mut ops = vec![Op::Literal(b'z'), Op::Match { dist: 0, len: 273 }];
    for _ in 0..20 {
        ops.push(Op::Rep {
            rep_index: 0,
            len: 273,
        });
    }
    let (xz, plain) = encode_and_decode(3, 0, 2, &ops);
    assert!(plain.len() > 4096);
    assert!(plain.iter().all(|&b| b == b'z'));
    assert_round_trips(&xz, &plain);
}

#[test]
fn new_match_then_rep_match_round_trip() {
    // Establish a repeated pattern with a fresh match, then reuse rep0 for a
    // second, longer copy, and finally close with a literal.
    let mut ops: Vec<Op> = b"AB".iter().map(|b| Op::Literal(*b)).collect();
    ops.push(Op::Match { dist: 1, len: 2 }); // copies "AB" again (distance 2, encoded as 1)
    ops.push(Op::Rep {
        rep_index: 0,
        len: 4,
    }); // reuse the same distance for a longer run
    ops.push(Op::Literal(b'!'));

    let (xz, plain) = encode_and_decode(3, 0, 2, &ops);
    assert_eq!(plain, b"ABABABAB!".to_vec());
    assert_round_trips(&xz, &plain);
}

#[test]
fn max_length_match_round_trips() {
    // A run long enough to require the length coder's "high" bucket (raw
    // length 255, real length 273 == MATCH_LEN_MAX).
    let mut ops = vec![Op::Literal(b'z')];
    ops.push(Op::Match { dist: 0, len: 273 });
    let (xz, plain) = encode_and_decode(3, 0, 2, &ops);
    assert_eq!(plain.len(), 274);
    assert!(plain.iter().all(|&b| b == b'z'));
    assert_round_trips(&xz, &plain);
}

#[test]
fn min_length_match_round_trips() {
    // Shortest possible new match: real length 2 (raw length 0, "low" bucket).
    let mut ops: Vec<Op> = b"xy".iter().map(|b| Op::Literal(*b)).collect();
    ops.push(Op::Match { dist: 1, len: 2 });
    let (xz, plain) = encode_and_decode(3, 0, 2, &ops);
    assert_eq!(plain, b"xyxy".to_vec());
    assert_round_trips(&xz, &plain);
}
