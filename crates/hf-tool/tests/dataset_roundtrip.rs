use std::fs;
use std::path::PathBuf;

use hf_hog::{HogConfig, feature_len};
use hf_tool::{extract_batch, load_file_list, load_rgb, write_sparse_features};
use image::{Rgb, RgbImage};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("hf-tool-{name}-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(dir.join("img")).expect("create scratch dir");
    dir
}

fn write_stripes(path: &PathBuf, w: u32, h: u32, vertical: bool) {
    let img = RgbImage::from_fn(w, h, |x, y| {
        let t = if vertical { x } else { y };
        if (t / 4) % 2 == 0 { Rgb([10, 20, 30]) } else { Rgb([240, 220, 200]) }
    });
    img.save(path).expect("write png");
}

#[test]
fn list_to_sparse_feature_file() {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = scratch_dir("roundtrip");
    write_stripes(&dir.join("img/a.png"), 40, 30, true);
    write_stripes(&dir.join("img/b.png"), 25, 50, false);
    fs::write(dir.join("list.txt"), "img/a.png 1\nimg/b.png -1\n").expect("write list");

    let samples = load_file_list(&dir.join("list.txt")).expect("valid list");
    assert_eq!(samples.len(), 2);
    assert_eq!(samples[0].path, dir.join("img/a.png"));

    let img = load_rgb(&samples[1].path).expect("decodable");
    assert_eq!((img.rows(), img.cols()), (50, 25));
    assert_eq!(img.get(0, 0), Some(&[10, 20, 30]));

    let cfg = HogConfig { cell_count: 4, ..HogConfig::default() };
    let feats = extract_batch(&samples, &cfg).expect("extracted");
    assert_eq!(feats.len(), 2);
    assert_eq!(feats[0].label, 1);
    assert_eq!(feats[1].label, -1);
    let len = feature_len(&cfg).expect("valid config");
    assert!(feats.iter().all(|f| f.values.len() == len));

    let mut buf = Vec::new();
    write_sparse_features(&mut buf, &feats).expect("in-memory write");
    let text = String::from_utf8(buf).expect("utf8");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("1 "));
    assert!(lines[1].starts_with("-1 "));
    for token in lines[0].split_whitespace().skip(1) {
        let (idx, value) = token.split_once(':').expect("index:value");
        let idx: usize = idx.parse().expect("index");
        let value: f32 = value.parse().expect("value");
        assert!((1..=len).contains(&idx));
        assert!(value != 0.0);
    }

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn missing_image_fails_the_batch() {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = scratch_dir("missing");
    fs::write(dir.join("list.txt"), "img/nope.png 0\n").expect("write list");

    let samples = load_file_list(&dir.join("list.txt")).expect("valid list");
    let err = extract_batch(&samples, &HogConfig::default()).expect_err("missing file");
    assert!(format!("{err:#}").contains("nope.png"), "{err:#}");

    let _ = fs::remove_dir_all(&dir);
}
