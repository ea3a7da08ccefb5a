//! Compresses a synthetic RGB image through the YCoCg + MANIAC pipeline and
//! verifies the decode restores it exactly.

use anyhow::{ensure, Context, Result};
use flif_codec::coder::rac::{RacInput, RacOutput};
use flif_codec::coder::symbol::UniformSymbolCoder;
use flif_codec::image::color_range::{ColorRanges, StaticColorRanges};
use flif_codec::image::pixels::Image;
use flif_codec::maniac::compound::{FinalPropertySymbolCoder, MetaPropertySymbolCoder};
use flif_codec::maniac::tree::{PropertyDecisionNode, PropertyRange, PropertyRanges, PropertyVal, Tree};
use flif_codec::transform::{Transform, TransformYCoCg};

const PIXEL_CODER_BITS: u32 = 10;

fn neighbor_properties(image: &Image, p: usize, r: u32, c: u32) -> Vec<PropertyVal> {
    let left = if c > 0 { image.get(p, r, c - 1) } else { 0 };
    let top = if r > 0 { image.get(p, r - 1, c) } else { 0 };
    vec![left, top]
}

fn property_ranges(ranges: &dyn ColorRanges, p: usize) -> PropertyRanges {
    let bounds = PropertyRange::new(ranges.min(p), ranges.max(p));
    vec![bounds, bounds]
}

fn initial_tree(prop_ranges: &PropertyRanges) -> Tree {
    let PropertyRange { min, max } = prop_ranges[0];
    let mut tree = Tree::new();
    tree[0] = PropertyDecisionNode {
        property: 0,
        count: 8,
        splitval: min + (max - min) / 2,
        child_id: 1,
        leaf_id: 0,
    };
    tree.push(PropertyDecisionNode::default());
    tree.push(PropertyDecisionNode::default());
    tree
}

fn encode(rgb: &image::RgbImage) -> Result<Vec<u8>> {
    let mut transform = TransformYCoCg::new();
    ensure!(
        transform.init(&StaticColorRanges::rgb(255)),
        "YCoCg does not apply to this image"
    );

    let mut images = [Image::from_rgb8(rgb)];
    transform.data(&mut images);
    let ranges = transform.meta(&mut images, Box::new(StaticColorRanges::rgb(255)));
    let img = &images[0];

    let mut rac = RacOutput::new(Vec::new());
    UniformSymbolCoder::write_int(&mut rac, 1, 0xFFFF, img.cols() as i32)?;
    UniformSymbolCoder::write_int(&mut rac, 1, 0xFFFF, img.rows() as i32)?;

    for p in 0..3 {
        let prop_ranges = property_ranges(ranges.as_ref(), p);
        let mut tree = initial_tree(&prop_ranges);
        let mut meta = MetaPropertySymbolCoder::new(prop_ranges.clone());
        meta.write_tree(&mut rac, &tree)?;

        let mut coder = FinalPropertySymbolCoder::new(&prop_ranges, &mut tree, PIXEL_CODER_BITS);
        for r in 0..img.rows() {
            for c in 0..img.cols() {
                let pp: Vec<_> = (0..p).map(|q| img.get(q, r, c)).collect();
                let (min, max) = ranges.minmax(p, &pp);
                let props = neighbor_properties(img, p, r, c);
                coder.write_int(&mut rac, &props, min, max, img.get(p, r, c))?;
            }
        }
    }
    Ok(rac.finish()?)
}

fn decode(data: &[u8]) -> Result<image::RgbImage> {
    let mut transform = TransformYCoCg::new();
    ensure!(transform.init(&StaticColorRanges::rgb(255)));

    let mut rac = RacInput::new(data)?;
    let cols = UniformSymbolCoder::read_int(&mut rac, 1, 0xFFFF)? as u32;
    let rows = UniformSymbolCoder::read_int(&mut rac, 1, 0xFFFF)? as u32;

    let mut img = Image::new(cols, rows, 3);
    let mut scratch = [Image::new(0, 0, 0)];
    let ranges = transform.meta(&mut scratch, Box::new(StaticColorRanges::rgb(255)));

    for p in 0..3 {
        let prop_ranges = property_ranges(ranges.as_ref(), p);
        let mut meta = MetaPropertySymbolCoder::new(prop_ranges.clone());
        let mut tree = Tree::new();
        meta.read_tree(&mut rac, &mut tree)
            .context("tree header is corrupt")?;

        let mut coder = FinalPropertySymbolCoder::new(&prop_ranges, &mut tree, PIXEL_CODER_BITS);
        for r in 0..rows {
            for c in 0..cols {
                let pp: Vec<_> = (0..p).map(|q| img.get(q, r, c)).collect();
                let (min, max) = ranges.minmax(p, &pp);
                let props = neighbor_properties(&img, p, r, c);
                let value = coder.read_int(&mut rac, &props, min, max)?;
                img.set(p, r, c, value);
            }
        }
    }

    let mut images = [img];
    transform.inv_data(&mut images);
    let [img] = images;
    Ok(img.to_rgb8())
}

fn main() -> Result<()> {
    let (width, height) = (128u32, 96u32);
    let rgb = image::RgbImage::from_fn(width, height, |x, y| {
        let r = ((x * 2) % 256) as u8;
        let g = ((y * 2 + x / 4) % 256) as u8;
        let b = (((x + y) / 2) % 256) as u8;
        image::Rgb([r, g, b])
    });

    let raw_size = (width * height * 3) as usize;
    let encoded = encode(&rgb)?;
    println!(
        "{}x{} RGB: {} raw bytes -> {} coded bytes ({:.1}%)",
        width,
        height,
        raw_size,
        encoded.len(),
        100.0 * encoded.len() as f64 / raw_size as f64
    );

    let decoded = decode(&encoded)?;
    ensure!(decoded == rgb, "decode mismatch");
    println!("lossless roundtrip verified");
    Ok(())
}
