//! End-to-end behavior of the hashing pipeline.

use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use image::{DynamicImage, GrayAlphaImage, GrayImage, ImageFormat, Luma, LumaA, Rgb, RgbImage};
use ndarray::{stack, Axis};
use pdqkit_core::pipeline::{normalize, RawPixels};
use pdqkit_core::{
    decode_hex, pdq_from_bytes, pdq_from_file, BitVector, Config, DecodeError, DecodedImage,
    HashComputationError, HashOptions, HashOutput, PdqError, PdqHasher, PdqPipeline,
    PerceptualHash, PixelArray,
};

type HashResult = Result<HashOutput, HashComputationError>;

fn encode(image: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), format).unwrap();
    bytes
}

fn gray_gradient(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageLuma8(GrayImage::from_fn(width, height, |x, y| {
        Luma([((x * 3 + y * 5) % 256) as u8])
    }))
}

fn color_pattern(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x * y) % 256) as u8])
    }))
}

/// Records the shape of every array it is handed.
#[derive(Default, Clone)]
struct RecordingHasher {
    shapes: Arc<Mutex<Vec<(usize, usize, usize)>>>,
}

impl PerceptualHash for RecordingHasher {
    fn compute(&self, pixels: &PixelArray) -> HashResult {
        self.shapes.lock().unwrap().push(pixels.dim());
        Ok(HashOutput {
            bits: BitVector::zeros(8),
            quality: 1,
        })
    }
}

#[test]
fn all_black_grayscale_hashes_to_zeros() {
    let bytes = encode(
        &DynamicImage::ImageLuma8(GrayImage::new(8, 8)),
        ImageFormat::Png,
    );
    let stub = |pixels: &PixelArray| -> HashResult {
        assert_eq!(pixels.dim(), (8, 8, 3));
        assert!(pixels.iter().all(|&v| v == 0));
        Ok(HashOutput {
            bits: BitVector::zeros(256),
            quality: 100,
        })
    };

    let output = PdqPipeline::with_hasher(&Config::default(), stub)
        .hash_bytes(&bytes)
        .unwrap();
    assert_eq!(output.into_pair(), ("0".repeat(64), 100));
}

#[test]
fn decode_failure_never_reaches_hasher() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let stub = move |_: &PixelArray| -> HashResult {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(HashOutput {
            bits: BitVector::zeros(256),
            quality: 0,
        })
    };
    let pipeline = PdqPipeline::with_hasher(&Config::default(), stub);

    let err = pipeline.hash_bytes(b"this is plain text").unwrap_err();
    assert!(matches!(err, PdqError::Decode(_)));

    let png = encode(&gray_gradient(64, 64), ImageFormat::Png);
    let err = pipeline.hash_bytes(&png[..png.len() - 40]).unwrap_err();
    assert!(matches!(err, PdqError::Decode(DecodeError::Image { .. })));

    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn grayscale_broadcast_matches_explicit_stack() {
    let decoded = DecodedImage::new(gray_gradient(48, 40));
    let RawPixels::Gray(gray) = decoded.to_array().unwrap() else {
        panic!("grayscale source should extract as 2-D");
    };
    let stacked = stack(Axis(2), &[gray.view(), gray.view(), gray.view()]).unwrap();

    let normalized = normalize(&decoded, false).unwrap();
    assert_eq!(normalized, stacked);

    let via_pipeline = PdqPipeline::default().hash_image(&decoded).unwrap();
    let direct = PdqHasher.compute(&stacked).unwrap();
    assert_eq!(via_pipeline.hash, pdqkit_core::encode_hex(&direct.bits));
    assert_eq!(via_pipeline.quality, direct.quality);
}

#[test]
fn luma_alpha_is_converted_to_three_channels() {
    let image = DynamicImage::ImageLumaA8(GrayAlphaImage::from_fn(16, 12, |x, y| {
        LumaA([(x * 10 + y) as u8, 128])
    }));
    let bytes = encode(&image, ImageFormat::Png);
    let recorder = RecordingHasher::default();

    for force_rgb in [false, true] {
        PdqPipeline::with_hasher(&Config::default(), recorder.clone())
            .options(HashOptions { force_rgb })
            .hash_bytes(&bytes)
            .unwrap();
    }

    let shapes = recorder.shapes.lock().unwrap();
    assert_eq!(shapes.as_slice(), &[(12, 16, 3), (12, 16, 3)]);
}

#[test]
fn force_rgb_converts_rgba_source() {
    let rgba = DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
        10,
        10,
        image::Rgba([10, 20, 30, 40]),
    ));
    let bytes = encode(&rgba, ImageFormat::Png);
    let recorder = RecordingHasher::default();

    for force_rgb in [false, true] {
        PdqPipeline::with_hasher(&Config::default(), recorder.clone())
            .options(HashOptions { force_rgb })
            .hash_bytes(&bytes)
            .unwrap();
    }

    let shapes = recorder.shapes.lock().unwrap();
    assert_eq!(shapes.as_slice(), &[(10, 10, 4), (10, 10, 3)]);
}

#[test]
fn hashing_is_deterministic() {
    let bytes = encode(&color_pattern(96, 64), ImageFormat::Png);
    for force_rgb in [false, true] {
        let first = pdq_from_bytes(&bytes, force_rgb).unwrap();
        let second = pdq_from_bytes(&bytes, force_rgb).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn file_and_bytes_agree() {
    let image = color_pattern(80, 80);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pattern.png");
    image.save(&path).unwrap();

    let from_file = pdq_from_file(&path, false).unwrap();
    let from_bytes = pdq_from_bytes(&std::fs::read(&path).unwrap(), false).unwrap();
    assert_eq!(from_file, from_bytes);
}

#[test]
fn pdq_hash_round_trips_through_hex() {
    let decoded = DecodedImage::new(color_pattern(64, 64));
    let pixels = normalize(&decoded, false).unwrap();
    let direct = PdqHasher.compute(&pixels).unwrap();

    let output = PdqPipeline::default().hash_image(&decoded).unwrap();
    assert_eq!(output.hash.len(), 64);
    assert_eq!(decode_hex(&output.hash, 256).unwrap(), direct.bits);
}

#[test]
fn missing_file_is_decode_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = pdq_from_file(dir.path().join("nope.jpg"), false).unwrap_err();
    assert!(matches!(err, PdqError::Decode(DecodeError::Io { .. })));
}

#[test]
fn jpeg_input_hashes() {
    let bytes = encode(&color_pattern(128, 96), ImageFormat::Jpeg);
    let output = pdq_from_bytes(&bytes, false).unwrap();
    assert_eq!(output.hash.len(), 64);
    assert!(output.quality <= 100);
}
