use serde_json::json;

use super::*;

fn temp_root(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "frameseq_save_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn gradient(h: usize, w: usize) -> ImageBatch {
    ImageBatch::from_shape_fn((1, h, w, 3), |(_, y, x, c)| {
        ((y * w + x) * 3 + c) as f32 / (h * w * 3) as f32
    })
}

#[test]
fn frame_file_name_pads_to_five_digits() {
    assert_eq!(
        frame_file_name("Sequence", FrameIndex(3)),
        "Sequence_00003.png"
    );
    assert_eq!(
        frame_file_name("shot", FrameIndex(1234567)),
        "shot_1234567.png"
    );
}

#[test]
fn save_writes_expected_layout() {
    let root = temp_root("layout");
    let node = SaveImageSequence::new(&root);

    let out = node
        .save(
            &gradient(4, 5),
            "Sequence",
            FrameIndex(3),
            &SaveMetadata::default(),
        )
        .unwrap();

    let expected = root.join("Sequence").join("Sequence_00003.png");
    assert_eq!(out.path, expected);
    assert_eq!(node.target_path("Sequence", FrameIndex(3)), expected);
    assert!(expected.is_file());

    let img = image::open(&expected).unwrap();
    assert_eq!((img.width(), img.height()), (5, 4));

    let ui = serde_json::to_value(&out).unwrap();
    assert_eq!(
        ui,
        json!({"ui": {"images": [{
            "filename": "Sequence_00003.png",
            "subfolder": "Sequence",
            "type": "output"
        }]}})
    );

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn save_rejects_multi_image_batch_without_touching_disk() {
    let root = temp_root("multi");
    let node = SaveImageSequence::new(&root);
    let batch = ImageBatch::zeros((2, 2, 2, 3));

    let err = node
        .save(&batch, "Sequence", FrameIndex(0), &SaveMetadata::default())
        .unwrap_err();
    assert!(matches!(err, SeqError::Validation(_)));
    assert!(err.to_string().contains("one image at a time"));
    assert!(!root.exists());
}

#[test]
fn save_rejects_empty_batch_and_bad_shapes() {
    let root = temp_root("shapes");
    let node = SaveImageSequence::new(&root);
    let meta = SaveMetadata::default();

    let empty = ImageBatch::zeros((0, 2, 2, 3));
    assert!(matches!(
        node.save(&empty, "S", FrameIndex(0), &meta),
        Err(SeqError::Validation(_))
    ));

    let two_channel = ImageBatch::zeros((1, 2, 2, 2));
    assert!(matches!(
        node.save(&two_channel, "S", FrameIndex(0), &meta),
        Err(SeqError::Validation(_))
    ));
    assert!(!root.exists());
}

#[test]
fn save_rejects_prefixes_that_are_not_one_component() {
    let root = temp_root("prefix");
    let node = SaveImageSequence::new(&root);
    let meta = SaveMetadata::default();
    for bad in ["", "a/b", "..", "./a", "/abs"] {
        let res = node.save(&gradient(1, 1), bad, FrameIndex(0), &meta);
        assert!(matches!(res, Err(SeqError::Validation(_))), "prefix {bad:?}");
    }
    assert!(!root.exists());
}

#[test]
fn save_clips_out_of_range_samples() {
    let root = temp_root("clip");
    let node = SaveImageSequence::new(&root);
    let mut batch = ImageBatch::zeros((1, 1, 2, 3));
    batch[[0, 0, 0, 0]] = -3.0;
    batch[[0, 0, 1, 0]] = 7.5;

    let out = node
        .save(&batch, "clip", FrameIndex(0), &SaveMetadata::default())
        .unwrap();
    let rgb = image::open(&out.path).unwrap().to_rgb8();
    assert_eq!(rgb.get_pixel(0, 0).0, [0, 0, 0]);
    assert_eq!(rgb.get_pixel(1, 0).0, [255, 0, 0]);

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn save_embeds_prompt_and_extra_metadata() {
    let root = temp_root("meta");
    let node = SaveImageSequence::new(&root);
    let mut extra = serde_json::Map::new();
    extra.insert("workflow".to_string(), json!({"nodes": [1, 2]}));
    extra.insert("seed".to_string(), json!(42));
    let meta = SaveMetadata {
        prompt: Some(json!({"3": {"class_type": "KSampler"}})),
        extra_pnginfo: Some(extra),
    };

    let out = node
        .save(&gradient(2, 2), "meta", FrameIndex(12), &meta)
        .unwrap();
    let text = crate::codec::decode::read_png_text(&out.path).unwrap();
    let get = |k: &str| {
        text.iter()
            .find(|(key, _)| key == k)
            .map(|(_, v)| serde_json::from_str::<serde_json::Value>(v).unwrap())
    };
    assert_eq!(get("prompt"), Some(json!({"3": {"class_type": "KSampler"}})));
    assert_eq!(get("workflow"), Some(json!({"nodes": [1, 2]})));
    assert_eq!(get("seed"), Some(json!(42)));
    assert_eq!(text.len(), 3);

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn save_keeps_extra_metadata_insertion_order() {
    let root = temp_root("order");
    let node = SaveImageSequence::new(&root);
    let mut extra = serde_json::Map::new();
    extra.insert("zeta".to_string(), json!(1));
    extra.insert("alpha".to_string(), json!(2));
    extra.insert("mid".to_string(), json!(3));
    let meta = SaveMetadata {
        prompt: Some(json!({})),
        extra_pnginfo: Some(extra),
    };

    let out = node
        .save(&gradient(1, 1), "order", FrameIndex(0), &meta)
        .unwrap();
    let keys: Vec<String> = crate::codec::decode::read_png_text(&out.path)
        .unwrap()
        .into_iter()
        .map(|(k, _)| k)
        .collect();
    assert_eq!(keys, ["prompt", "zeta", "alpha", "mid"]);

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn metadata_to_png_text_orders_prompt_first() {
    let mut extra = serde_json::Map::new();
    extra.insert("a".to_string(), json!("x"));
    let meta = SaveMetadata {
        prompt: Some(json!(1)),
        extra_pnginfo: Some(extra),
    };
    let text = meta.to_png_text().unwrap();
    assert_eq!(
        text,
        vec![PngText::new("prompt", "1"), PngText::new("a", "\"x\"")]
    );
    assert!(SaveMetadata::default().to_png_text().unwrap().is_empty());
}

#[test]
fn schema_is_output_only() {
    let schema = SaveImageSequence::schema();
    assert!(schema.output_node);
    assert!(schema.outputs.is_empty());
    assert_eq!(
        schema.input("filename_prefix").unwrap().default,
        Some(json!("Sequence"))
    );
    assert!(schema.input("prompt").unwrap().hidden);
    assert!(schema.input("extra_pnginfo").unwrap().hidden);
}
