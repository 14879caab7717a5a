use std::fs;
use std::path::PathBuf;

use sha2::{Digest, Sha256};
use word2pic::render_text;

fn golden_path(name: &str) -> PathBuf {
    let mut p = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    p.push("tests/goldens/expected");
    p.push(name);
    p
}

const CASES: [(&str, &str, (u32, u32)); 4] = [
    ("simple", "Hello, word2pic!", (300, 147)),
    ("literary", "床前明月光，疑是地上霜。举头望明月，低头思故乡。", (300, 194)),
    ("business", "Q3 revenue up 12% year over year", (300, 174)),
    ("colorful", "今天也要开心哦 :)", (300, 157)),
];

/// Hex SHA-256 of the decoded RGBA rows, independent of PNG compression
fn pixel_digest(png_data: &[u8]) -> (u32, u32, String) {
    let decoder = png::Decoder::new(png_data);
    let mut reader = decoder.read_info().expect("decode");
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf).expect("frame");
    assert_eq!(info.color_type, png::ColorType::Rgba);
    assert_eq!(info.bit_depth, png::BitDepth::Eight);
    buf.truncate(info.buffer_size());
    (info.width, info.height, hex::encode(Sha256::digest(&buf)))
}

#[test]
fn rendering_is_deterministic() {
    for (style, text, _) in CASES {
        let a = render_text(text, style).unwrap();
        let b = render_text(text, style).unwrap();
        assert_eq!(a.png_data, b.png_data, "{} output differs between runs", style);
    }
}

#[test]
fn golden_digests_match_fixtures() {
    for (style, text, dims) in CASES {
        let card = render_text(text, style).unwrap();
        let (width, height, digest) = pixel_digest(&card.png_data);
        assert_eq!((width, height), dims, "{} dimensions changed", style);
        let expected_path = golden_path(&format!("{}.sha256", style));

        if std::env::var("UPDATE_GOLDENS").is_ok() {
            fs::create_dir_all(golden_path("")).expect("create golden dir");
            fs::write(&expected_path, format!("{}\n", digest)).expect("write golden");
            println!("Updated golden: {:?}", expected_path);
            continue;
        }

        let exp = fs::read_to_string(&expected_path)
            .unwrap_or_else(|e| panic!("missing golden {:?} ({}); run with UPDATE_GOLDENS=1", expected_path, e));
        assert!(hex::decode(exp.trim()).is_ok(), "invalid hex in golden");
        assert_eq!(digest, exp.trim(), "{} card changed", style);
    }
}
