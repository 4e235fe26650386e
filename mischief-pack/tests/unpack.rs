//! End-to-end decompression scenarios.
//!
//! Streams are synthesized with the token-level encoder and decoded with
//! the public API; expected output is computed by replaying the token
//! semantics directly against an output window and distance history.

use mischief_core::error::MischiefError;
use mischief_pack::{ArtEncoder, MruDistances, OutputWindow, unpack};

/// One LZ77 token as the tests describe it.
#[derive(Debug, Clone, Copy)]
enum Token {
    Literal(u8),
    CopyNew { distance: u32, len: usize },
    CopyReused { index: usize, len: usize },
    CopyTrivial,
}

/// Encode a token sequence into a full payload.
fn encode(tokens: &[Token]) -> Vec<u8> {
    let mut encoder = ArtEncoder::new();
    for &token in tokens {
        match token {
            Token::Literal(byte) => encoder.literal(byte),
            Token::CopyNew { distance, len } => encoder.copy_new(distance, len),
            Token::CopyReused { index, len } => encoder.copy_reused(index, len),
            Token::CopyTrivial => encoder.copy_trivial(),
        }
    }
    encoder.finish_payload()
}

/// Replay token semantics to compute the bytes a correct decoder yields.
fn replay(tokens: &[Token]) -> Vec<u8> {
    let mut window = OutputWindow::with_capacity(0);
    let mut mru = MruDistances::new();
    for &token in tokens {
        match token {
            Token::Literal(byte) => window.push(byte),
            Token::CopyNew { distance, len } => {
                mru.push(distance);
                window.copy(distance as usize, len);
            }
            Token::CopyReused { index, len } => {
                let distance = mru.promote(index);
                window.copy(distance as usize, len);
            }
            Token::CopyTrivial => window.copy(mru.head() as usize, 1),
        }
    }
    window.into_bytes()
}

fn assert_round_trip(tokens: &[Token]) {
    let expected = replay(tokens);
    let decoded = unpack(&encode(tokens)).unwrap();
    assert_eq!(decoded, expected);
}

/// Deterministic byte generator for fixture data.
fn pseudo_random_bytes(count: usize, mut seed: u32) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(count);
    for _ in 0..count {
        seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        bytes.push((seed >> 24) as u8);
    }
    bytes
}

#[test]
fn empty_payload_decodes_to_nothing() {
    let payload = [0u8; 9];
    assert_eq!(unpack(&payload).unwrap(), Vec::<u8>::new());
}

#[test]
fn sixteen_byte_zero_run() {
    let tokens = [
        Token::Literal(0x00),
        Token::CopyNew {
            distance: 0,
            len: 15,
        },
    ];
    let decoded = unpack(&encode(&tokens)).unwrap();
    assert_eq!(decoded, vec![0u8; 16]);
}

#[test]
fn alternating_pattern_via_trivial_copies() {
    let tokens = [
        Token::Literal(b'A'),
        Token::Literal(b'B'),
        Token::CopyNew { distance: 1, len: 2 },
        Token::CopyTrivial,
        Token::CopyTrivial,
        Token::CopyTrivial,
        Token::CopyTrivial,
    ];
    let decoded = unpack(&encode(&tokens)).unwrap();
    assert_eq!(decoded, b"ABABABAB");
}

#[test]
fn long_distance_exercises_raw_bit_tail() {
    // Distance 200 needs six extra bits: two raw middle bits plus the
    // aligned nibble.
    let mut tokens: Vec<Token> = pseudo_random_bytes(256, 7)
        .into_iter()
        .map(Token::Literal)
        .collect();
    tokens.push(Token::CopyNew {
        distance: 200,
        len: 256,
    });
    let expected = replay(&tokens);
    assert_eq!(expected.len(), 512);
    let decoded = unpack(&encode(&tokens)).unwrap();
    assert_eq!(decoded, expected);
}

#[test]
fn very_long_distance_round_trips() {
    // A distance wide enough to spend many raw bits (width 17).
    let mut tokens: Vec<Token> = pseudo_random_bytes(70_000, 3)
        .into_iter()
        .map(Token::Literal)
        .collect();
    tokens.push(Token::CopyNew {
        distance: 65_000,
        len: 64,
    });
    assert_round_trip(&tokens);
}

#[test]
fn reused_distances_promote_through_history() {
    let mut tokens: Vec<Token> = pseudo_random_bytes(64, 11)
        .into_iter()
        .map(Token::Literal)
        .collect();
    tokens.extend([
        Token::CopyNew { distance: 5, len: 4 },
        Token::CopyNew { distance: 17, len: 3 },
        Token::CopyNew { distance: 2, len: 6 },
        Token::CopyNew { distance: 40, len: 2 },
        // History is now [40, 2, 17, 5]; exercise every promote index.
        Token::CopyReused { index: 3, len: 4 },
        Token::CopyReused { index: 0, len: 5 },
        Token::CopyReused { index: 2, len: 2 },
        Token::CopyTrivial,
        Token::CopyReused { index: 1, len: 8 },
    ]);
    assert_round_trip(&tokens);
}

#[test]
fn literal_after_copy_uses_mismatch_context() {
    // A literal that disagrees with the would-be-copied byte right after a
    // reference exercises the reference-guided literal path.
    let mut tokens: Vec<Token> = b"abcdabc".iter().copied().map(Token::Literal).collect();
    tokens.push(Token::CopyNew { distance: 3, len: 2 });
    // The copy stopped before another 'c'; emit something else.
    tokens.push(Token::Literal(b'z'));
    tokens.push(Token::Literal(b'c'));
    assert_round_trip(&tokens);
}

#[test]
fn lengths_cover_all_three_ranges() {
    let mut tokens: Vec<Token> = pseudo_random_bytes(16, 23)
        .into_iter()
        .map(Token::Literal)
        .collect();
    for len in [2, 9, 10, 17, 24, 100, 273] {
        tokens.push(Token::CopyNew { distance: 3, len });
    }
    assert_round_trip(&tokens);
}

#[test]
fn mixed_token_stream_round_trips() {
    let data = pseudo_random_bytes(48, 99);
    let mut tokens: Vec<Token> = data.into_iter().map(Token::Literal).collect();
    tokens.extend([
        Token::CopyNew { distance: 7, len: 12 },
        Token::CopyTrivial,
        Token::Literal(0x00),
        Token::CopyReused { index: 0, len: 3 },
        Token::Literal(0xFF),
        Token::CopyNew { distance: 31, len: 2 },
        Token::CopyReused { index: 1, len: 20 },
        Token::CopyTrivial,
        Token::CopyTrivial,
        Token::Literal(0x80),
        Token::CopyNew { distance: 150, len: 30 },
        Token::CopyReused { index: 3, len: 5 },
    ]);
    assert_round_trip(&tokens);
}

#[test]
fn announced_length_past_end_marker_underflows() {
    let mut encoder = ArtEncoder::new();
    for byte in b"abc" {
        encoder.literal(*byte);
    }
    encoder.end_marker();
    let stream = encoder.finish();

    // Announce one byte more than the stream encodes.
    let mut payload = 4u32.to_le_bytes().to_vec();
    payload.extend_from_slice(&stream);

    let err = unpack(&payload).unwrap_err();
    assert!(matches!(
        err,
        MischiefError::StreamUnderflow {
            decoded: 3,
            expected: 4
        }
    ));
}

#[test]
fn copy_past_announced_length_overflows() {
    let mut encoder = ArtEncoder::new();
    encoder.literal(b'a');
    encoder.copy_new(0, 8);
    let stream = encoder.finish();

    // Announce less than the copy produces.
    let mut payload = 4u32.to_le_bytes().to_vec();
    payload.extend_from_slice(&stream);

    let err = unpack(&payload).unwrap_err();
    assert!(matches!(
        err,
        MischiefError::StreamOverflow {
            length: 1,
            limit: 4
        }
    ));
}

#[test]
fn sign_bit_distance_is_rejected() {
    // A distance with the top bit set that is not the end marker can only
    // come from a corrupt stream.
    let mut encoder = ArtEncoder::new();
    encoder.literal(b'a');
    encoder.copy_new(0x8000_0001, 2);
    let stream = encoder.finish();

    let mut payload = 3u32.to_le_bytes().to_vec();
    payload.extend_from_slice(&stream);

    let err = unpack(&payload).unwrap_err();
    assert!(matches!(
        err,
        MischiefError::BadDistance {
            distance: 0x8000_0001
        }
    ));
}

#[test]
fn end_marker_at_exact_length_is_not_consumed() {
    // When the announced length is reached, the loop stops before the
    // marker; trailing stream bytes are simply never read.
    let mut encoder = ArtEncoder::new();
    for byte in b"done" {
        encoder.literal(*byte);
    }
    encoder.end_marker();
    assert_eq!(unpack(&encoder.finish_payload()).unwrap(), b"done");
}
