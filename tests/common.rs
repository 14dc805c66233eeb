#![allow(dead_code)]

use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub fn create_temp_directory() -> TempDir {
    TempDir::new().unwrap()
}

/// Opaque RGB PNG with a gradient so the JPEG encoder has real work to do.
pub fn write_png(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    });
    img.save_with_format(path, ImageFormat::Png).unwrap();
}

/// PNG with a varying alpha channel.
pub fn write_transparent_png(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let img = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([200, (x % 256) as u8, (y % 256) as u8, ((x * 3) % 256) as u8])
    });
    img.save_with_format(path, ImageFormat::Png).unwrap();
}

pub fn write_jpeg(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let img = RgbImage::from_fn(width, height, |x, y| Rgb([(x % 256) as u8, 64, (y % 256) as u8]));
    img.save_with_format(path, ImageFormat::Jpeg).unwrap();
}

pub fn write_corrupt(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, b"\xFF\xD8 these are not the bytes you are looking for").unwrap();
}

/// `a.png` (500x500 opaque), `b.jpg` (corrupt), `sub/c.jpeg`, plus a text file.
pub fn create_scenario_tree(input: &Path) -> (PathBuf, PathBuf, PathBuf) {
    let a = input.join("a.png");
    let b = input.join("b.jpg");
    let c = input.join("sub").join("c.jpeg");

    write_png(&a, 500, 500);
    write_corrupt(&b);
    write_jpeg(&c, 120, 80);
    fs::write(input.join("readme.txt"), "not an image").unwrap();

    (a.canonicalize().unwrap(), b.canonicalize().unwrap(), c.canonicalize().unwrap())
}

pub fn is_valid_jpeg(path: &Path) -> bool {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(_) => return false,
    };
    image::guess_format(&bytes).ok() == Some(ImageFormat::Jpeg)
        && image::load_from_memory_with_format(&bytes, ImageFormat::Jpeg).is_ok()
}

pub fn sorted(mut paths: Vec<PathBuf>) -> Vec<PathBuf> {
    paths.sort();
    paths
}
