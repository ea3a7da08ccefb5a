//! MANIAC compound symbol coding: per-leaf chance tables selected by
//! routing a property vector through the decision tree.
//!
//! The tree starts as a single leaf and refines itself while coding. Every
//! inner node carries a countdown; once enough samples have passed through,
//! the node activates and its leaf chances are duplicated into the two
//! children, so both start from the statistics the parent already learned.
//! Encoder and decoder replay the same property sequence and therefore
//! perform the same splits at the same moments.

use crate::coder::chance::ChanceTable;
use crate::coder::rac::{RacRead, RacWrite};
use crate::coder::symbol::{self, BitKind, BitRead, BitWrite, SimpleSymbolCoder, SymbolChance};
use crate::maniac::tree::{PropertyDecisionNode, PropertyRanges, PropertyVal, Tree};
use crate::utils::error::{CodecError, Result};

/// Update-table configuration for the per-leaf compound coders.
pub const COMPOUND_CUT: u32 = 4;
pub const COMPOUND_ALPHA: u32 = 0xFFFF_FFFF / 20;

/// Range of the meta-coded node activation counts.
pub const CONTEXT_TREE_MIN_COUNT: i32 = 1;
pub const CONTEXT_TREE_MAX_COUNT: i32 = 512;

/// Encoder-side tree simplification parameters; unused by the decoding path.
pub const CONTEXT_TREE_COUNT_DIV: i32 = 30;
pub const CONTEXT_TREE_MIN_SUBTREE_SIZE: i32 = 50;

/// Symbol width of the tree meta coder.
pub const META_CODER_BITS: u32 = 18;

/// Hard bounds on tree nesting and size; a stream asking for more is
/// corrupt. They keep a damaged stream from exhausting the call stack or
/// memory, since reads past the end of input keep yielding padding.
const MAX_TREE_DEPTH: usize = 1024;
const MAX_TREE_NODES: usize = 1 << 20;

/// Chance tables owned by one leaf of the decision tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalCompoundSymbolChances {
    real_chances: SymbolChance,
}

impl FinalCompoundSymbolChances {
    pub fn new(bits: u32) -> Self {
        Self {
            real_chances: SymbolChance::new(bits),
        }
    }

    pub fn chances(&self) -> &SymbolChance {
        &self.real_chances
    }
}

/// Codes one bit against a leaf's chance at `(kind, i)`, updating the
/// chance with the observed value.
pub struct FinalCompoundSymbolBitCoder<'a, RAC> {
    table: &'a ChanceTable,
    rac: &'a mut RAC,
    chances: &'a mut FinalCompoundSymbolChances,
}

impl<'a, RAC> FinalCompoundSymbolBitCoder<'a, RAC> {
    pub fn new(
        table: &'a ChanceTable,
        rac: &'a mut RAC,
        chances: &'a mut FinalCompoundSymbolChances,
    ) -> Self {
        Self {
            table,
            rac,
            chances,
        }
    }
}

impl<RAC: RacRead> BitRead for FinalCompoundSymbolBitCoder<'_, RAC> {
    #[inline]
    fn read(&mut self, kind: BitKind, i: usize) -> Result<bool> {
        let chance = self.chances.real_chances.bit(kind, i).get_12bit();
        let bit = self.rac.read_12bit_chance(chance)?;
        self.chances.real_chances.bit_mut(kind, i).put(bit, self.table);
        Ok(bit)
    }
}

impl<RAC: RacWrite> BitWrite for FinalCompoundSymbolBitCoder<'_, RAC> {
    #[inline]
    fn write(&mut self, bit: bool, kind: BitKind, i: usize) -> Result<()> {
        let chance = self.chances.real_chances.bit(kind, i).get_12bit();
        self.rac.write_12bit_chance(chance, bit)?;
        self.chances.real_chances.bit_mut(kind, i).put(bit, self.table);
        Ok(())
    }
}

/// Integer coder over a caller-supplied leaf. Owns nothing but the shared
/// update table.
pub struct FinalCompoundSymbolCoder {
    table: ChanceTable,
}

impl FinalCompoundSymbolCoder {
    pub fn new(cut: u32, alpha: u32) -> Self {
        Self {
            table: ChanceTable::new(cut, alpha),
        }
    }

    pub fn read_int<R: RacRead>(
        &self,
        rac: &mut R,
        chances: &mut FinalCompoundSymbolChances,
        min: i32,
        max: i32,
    ) -> Result<i32> {
        if min == max {
            return Ok(min);
        }
        let mut bit_coder = FinalCompoundSymbolBitCoder::new(&self.table, rac, chances);
        symbol::read_int(&mut bit_coder, min, max)
    }

    pub fn read_uint<R: RacRead>(
        &self,
        rac: &mut R,
        chances: &mut FinalCompoundSymbolChances,
        nbits: u32,
    ) -> Result<i32> {
        let mut bit_coder = FinalCompoundSymbolBitCoder::new(&self.table, rac, chances);
        symbol::read_uint(&mut bit_coder, nbits)
    }

    pub fn write_int<W: RacWrite>(
        &self,
        rac: &mut W,
        chances: &mut FinalCompoundSymbolChances,
        min: i32,
        max: i32,
        value: i32,
    ) -> Result<()> {
        if min == max {
            return Ok(());
        }
        let mut bit_coder = FinalCompoundSymbolBitCoder::new(&self.table, rac, chances);
        symbol::write_int(&mut bit_coder, min, max, value)
    }

    pub fn write_uint<W: RacWrite>(
        &self,
        rac: &mut W,
        chances: &mut FinalCompoundSymbolChances,
        nbits: u32,
        value: i32,
    ) -> Result<()> {
        let mut bit_coder = FinalCompoundSymbolBitCoder::new(&self.table, rac, chances);
        symbol::write_uint(&mut bit_coder, nbits, value)
    }
}

/// Property-routed integer coder over an externally owned tree.
///
/// The tree is borrowed for the coder's lifetime; leaf chances live in the
/// coder itself. `find_leaf` hands out leaf-store indices rather than
/// references, so appends during a lazy split never invalidate anything.
pub struct FinalPropertySymbolCoder<'t> {
    coder: FinalCompoundSymbolCoder,
    nb_properties: usize,
    leaf_node: Vec<FinalCompoundSymbolChances>,
    inner_node: &'t mut Tree,
}

impl<'t> FinalPropertySymbolCoder<'t> {
    pub fn new(ranges: &PropertyRanges, tree: &'t mut Tree, bits: u32) -> Self {
        Self::with_table(ranges, tree, bits, COMPOUND_CUT, COMPOUND_ALPHA)
    }

    pub fn with_table(
        ranges: &PropertyRanges,
        tree: &'t mut Tree,
        bits: u32,
        cut: u32,
        alpha: u32,
    ) -> Self {
        tree[0].leaf_id = 0;
        Self {
            coder: FinalCompoundSymbolCoder::new(cut, alpha),
            nb_properties: ranges.len(),
            leaf_node: vec![FinalCompoundSymbolChances::new(bits)],
            inner_node: tree,
        }
    }

    /// Number of materialized leaves; grows monotonically under lazy splits.
    pub fn num_leaves(&self) -> usize {
        self.leaf_node.len()
    }

    /// Read access to a leaf's chance tables.
    pub fn leaf(&self, id: usize) -> &FinalCompoundSymbolChances {
        &self.leaf_node[id]
    }

    fn find_leaf(&mut self, properties: &[PropertyVal]) -> usize {
        let mut pos = 0usize;
        loop {
            let node = &self.inner_node[pos];
            if node.property == -1 {
                return node.leaf_id as usize;
            }
            let property = node.property as usize;
            let count = node.count;
            let splitval = node.splitval;
            let child_id = node.child_id as usize;
            let leaf_id = node.leaf_id as usize;
            if count < 0 {
                pos = if properties[property] > splitval {
                    child_id
                } else {
                    child_id + 1
                };
            } else if count > 0 {
                // still accumulating visits toward activation
                self.inner_node[pos].count -= 1;
                return leaf_id;
            } else {
                // Lazy split. The node becomes a routing node, and both
                // children inherit this leaf's adapted chances: the sibling
                // gets a fresh copy appended to the leaf store.
                self.inner_node[pos].count -= 1;
                let old_leaf = leaf_id;
                let new_leaf = self.leaf_node.len();
                let copy = self.leaf_node[old_leaf].clone();
                self.leaf_node.push(copy);
                self.inner_node[child_id].leaf_id = old_leaf as u32;
                self.inner_node[child_id + 1].leaf_id = new_leaf as u32;
                return if properties[property] > splitval {
                    old_leaf
                } else {
                    new_leaf
                };
            }
        }
    }

    pub fn read_int<R: RacRead>(
        &mut self,
        rac: &mut R,
        properties: &[PropertyVal],
        min: i32,
        max: i32,
    ) -> Result<i32> {
        if min == max {
            return Ok(min);
        }
        debug_assert_eq!(properties.len(), self.nb_properties);
        let leaf = self.find_leaf(properties);
        self.coder.read_int(rac, &mut self.leaf_node[leaf], min, max)
    }

    pub fn read_uint<R: RacRead>(
        &mut self,
        rac: &mut R,
        properties: &[PropertyVal],
        nbits: u32,
    ) -> Result<i32> {
        debug_assert_eq!(properties.len(), self.nb_properties);
        let leaf = self.find_leaf(properties);
        self.coder.read_uint(rac, &mut self.leaf_node[leaf], nbits)
    }

    pub fn write_int<W: RacWrite>(
        &mut self,
        rac: &mut W,
        properties: &[PropertyVal],
        min: i32,
        max: i32,
        value: i32,
    ) -> Result<()> {
        if value < min || value > max {
            return Err(CodecError::ValueOutOfRange { value, min, max });
        }
        if min == max {
            return Ok(());
        }
        debug_assert_eq!(properties.len(), self.nb_properties);
        let leaf = self.find_leaf(properties);
        self.coder
            .write_int(rac, &mut self.leaf_node[leaf], min, max, value)
    }

    pub fn write_uint<W: RacWrite>(
        &mut self,
        rac: &mut W,
        properties: &[PropertyVal],
        nbits: u32,
        value: i32,
    ) -> Result<()> {
        debug_assert_eq!(properties.len(), self.nb_properties);
        let leaf = self.find_leaf(properties);
        self.coder
            .write_uint(rac, &mut self.leaf_node[leaf], nbits, value)
    }

    /// Encoder-side tree simplification hook; the decoding path keeps the
    /// tree exactly as meta-coded.
    pub fn simplify(&mut self, _divisor: i32, _min_size: i32) {}
}

/// Serializes and deserializes the decision tree itself.
///
/// The wire format is a pre-order walk: `property + 1` (0 marks a leaf),
/// then the activation count, then the split value inside the property's
/// current subrange; child subtrees follow with the subrange narrowed to
/// their side of the split.
pub struct MetaPropertySymbolCoder {
    coder: SimpleSymbolCoder,
    range: PropertyRanges,
    nb_properties: usize,
}

impl MetaPropertySymbolCoder {
    pub fn new(ranges: PropertyRanges) -> Self {
        debug_assert!(ranges.iter().all(|r| r.min <= r.max));
        debug_assert!(ranges.len() < 128);
        let nb_properties = ranges.len();
        Self {
            coder: SimpleSymbolCoder::new(META_CODER_BITS),
            range: ranges,
            nb_properties,
        }
    }

    fn read_subtree<R: RacRead>(
        &mut self,
        rac: &mut R,
        pos: usize,
        subrange: &mut PropertyRanges,
        tree: &mut Tree,
        depth: usize,
    ) -> Result<()> {
        if depth > MAX_TREE_DEPTH || tree.len() > MAX_TREE_NODES {
            log::error!("Invalid tree. Aborting tree decoding.");
            return Err(CodecError::InvalidTree);
        }
        let p = self.coder.read_int(rac, 0, self.nb_properties as i32)? - 1;
        tree[pos].property = p as i8;
        if p == -1 {
            return Ok(());
        }

        let p = p as usize;
        let old_min = subrange[p].min;
        let old_max = subrange[p].max;
        if old_min >= old_max {
            log::error!("Invalid tree. Aborting tree decoding.");
            return Err(CodecError::InvalidTree);
        }
        tree[pos].count = self
            .coder
            .read_int(rac, CONTEXT_TREE_MIN_COUNT, CONTEXT_TREE_MAX_COUNT)? as i16;
        let splitval = self.coder.read_int(rac, old_min, old_max - 1)?;
        tree[pos].splitval = splitval;
        let child_id = tree.len() as u32;
        tree[pos].child_id = child_id;
        tree.push(PropertyDecisionNode::default());
        tree.push(PropertyDecisionNode::default());

        // > splitval
        subrange[p].min = splitval + 1;
        self.read_subtree(rac, child_id as usize, subrange, tree, depth + 1)?;

        // <= splitval
        subrange[p].min = old_min;
        subrange[p].max = splitval;
        self.read_subtree(rac, child_id as usize + 1, subrange, tree, depth + 1)?;

        subrange[p].max = old_max;
        Ok(())
    }

    /// Rebuilds `tree` from the stream. On failure the session is corrupt
    /// and must be abandoned.
    pub fn read_tree<R: RacRead>(&mut self, rac: &mut R, tree: &mut Tree) -> Result<()> {
        let mut rootrange = self.range.clone();
        tree.reset();
        self.read_subtree(rac, 0, &mut rootrange, tree, 0)
    }

    fn write_subtree<W: RacWrite>(
        &mut self,
        rac: &mut W,
        pos: usize,
        subrange: &mut PropertyRanges,
        tree: &Tree,
        depth: usize,
    ) -> Result<()> {
        if depth > MAX_TREE_DEPTH {
            return Err(CodecError::InvalidTree);
        }
        let n = &tree[pos];
        let p = n.property;
        self.coder
            .write_int(rac, 0, self.nb_properties as i32, p as i32 + 1)?;
        if p == -1 {
            return Ok(());
        }

        let (count, splitval, child_id) = (n.count, n.splitval, n.child_id as usize);
        let p = p as usize;
        let old_min = subrange[p].min;
        let old_max = subrange[p].max;
        if old_min >= old_max {
            return Err(CodecError::InvalidTree);
        }
        self.coder.write_int(
            rac,
            CONTEXT_TREE_MIN_COUNT,
            CONTEXT_TREE_MAX_COUNT,
            count as i32,
        )?;
        self.coder.write_int(rac, old_min, old_max - 1, splitval)?;

        // > splitval
        subrange[p].min = splitval + 1;
        self.write_subtree(rac, child_id, subrange, tree, depth + 1)?;

        // <= splitval
        subrange[p].min = old_min;
        subrange[p].max = splitval;
        self.write_subtree(rac, child_id + 1, subrange, tree, depth + 1)?;

        subrange[p].max = old_max;
        Ok(())
    }

    pub fn write_tree<W: RacWrite>(&mut self, rac: &mut W, tree: &Tree) -> Result<()> {
        let mut rootrange = self.range.clone();
        self.write_subtree(rac, 0, &mut rootrange, tree, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coder::rac::{RacInput, RacOutput};
    use crate::maniac::tree::PropertyRange;

    fn rgb_ranges() -> PropertyRanges {
        vec![
            PropertyRange::new(0, 255),
            PropertyRange::new(0, 255),
            PropertyRange::new(0, 255),
        ]
    }

    fn tree_roundtrip(ranges: PropertyRanges, tree: &Tree) -> Tree {
        let mut meta = MetaPropertySymbolCoder::new(ranges.clone());
        let mut rac = RacOutput::new(Vec::new());
        meta.write_tree(&mut rac, tree).unwrap();
        let encoded = rac.finish().unwrap();

        let mut meta = MetaPropertySymbolCoder::new(ranges);
        let mut rac = RacInput::new(&encoded[..]).unwrap();
        let mut decoded = Tree::new();
        meta.read_tree(&mut rac, &mut decoded).unwrap();
        decoded
    }

    #[test]
    fn test_empty_tree_roundtrip() {
        let decoded = tree_roundtrip(rgb_ranges(), &Tree::new());
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].property, -1);
        assert_eq!(decoded[0].leaf_id, 0);
    }

    #[test]
    fn test_single_split_roundtrip() {
        let mut tree = Tree::new();
        tree[0] = PropertyDecisionNode {
            property: 1,
            count: CONTEXT_TREE_MIN_COUNT as i16,
            splitval: 128,
            child_id: 1,
            leaf_id: 0,
        };
        tree.push(PropertyDecisionNode::default());
        tree.push(PropertyDecisionNode::default());

        let decoded = tree_roundtrip(rgb_ranges(), &tree);
        assert_eq!(decoded.len(), 3);
        assert_eq!(decoded[0].property, 1);
        assert_eq!(decoded[0].count, CONTEXT_TREE_MIN_COUNT as i16);
        assert_eq!(decoded[0].splitval, 128);
        assert_eq!(decoded[0].child_id, 1);
        assert_eq!(decoded[1].property, -1);
        assert_eq!(decoded[2].property, -1);
    }

    #[test]
    fn test_nested_tree_roundtrip() {
        // root splits on p0, its high side splits again on p0, low side on p2
        let mut tree = Tree::new();
        tree[0] = PropertyDecisionNode {
            property: 0,
            count: 12,
            splitval: 100,
            child_id: 1,
            leaf_id: 0,
        };
        tree.push(PropertyDecisionNode {
            property: 0,
            count: 3,
            splitval: 200,
            child_id: 3,
            leaf_id: 0,
        });
        tree.push(PropertyDecisionNode {
            property: 2,
            count: 507,
            splitval: 0,
            child_id: 5,
            leaf_id: 0,
        });
        for _ in 0..4 {
            tree.push(PropertyDecisionNode::default());
        }

        let decoded = tree_roundtrip(rgb_ranges(), &tree);
        assert_eq!(decoded.len(), tree.len());
        for pos in 0..tree.len() {
            assert_eq!(decoded[pos].property, tree[pos].property, "node {}", pos);
            assert_eq!(decoded[pos].splitval, tree[pos].splitval, "node {}", pos);
            assert_eq!(decoded[pos].child_id, tree[pos].child_id, "node {}", pos);
            if tree[pos].property != -1 {
                assert_eq!(decoded[pos].count, tree[pos].count, "node {}", pos);
            }
        }
    }

    #[test]
    fn test_write_tree_rejects_bad_count() {
        let mut tree = Tree::new();
        tree[0] = PropertyDecisionNode {
            property: 0,
            count: 0, // below CONTEXT_TREE_MIN_COUNT
            splitval: 10,
            child_id: 1,
            leaf_id: 0,
        };
        tree.push(PropertyDecisionNode::default());
        tree.push(PropertyDecisionNode::default());

        let mut meta = MetaPropertySymbolCoder::new(rgb_ranges());
        let mut rac = RacOutput::new(Vec::new());
        assert!(matches!(
            meta.write_tree(&mut rac, &tree),
            Err(CodecError::ValueOutOfRange { .. })
        ));
    }

    #[test]
    fn test_read_tree_rejects_exhausted_subrange() {
        // Hand-code a stream that splits a one-value property, then claims
        // to split it again inside the empty side.
        let ranges = vec![PropertyRange::new(5, 6)];
        let mut raw = SimpleSymbolCoder::new(META_CODER_BITS);
        let mut rac = RacOutput::new(Vec::new());
        raw.write_int(&mut rac, 0, 1, 1).unwrap(); // root: property 0
        raw.write_int(&mut rac, 1, 512, 5).unwrap(); // count
        raw.write_int(&mut rac, 5, 5, 5).unwrap(); // splitval (no bits)
        raw.write_int(&mut rac, 0, 1, 1).unwrap(); // left child: property 0 again
        let encoded = rac.finish().unwrap();

        let mut meta = MetaPropertySymbolCoder::new(ranges);
        let mut rac = RacInput::new(&encoded[..]).unwrap();
        let mut tree = Tree::new();
        assert!(matches!(
            meta.read_tree(&mut rac, &mut tree),
            Err(CodecError::InvalidTree)
        ));
    }

    #[test]
    fn test_lazy_split_activation() {
        let ranges = vec![PropertyRange::new(0, 255), PropertyRange::new(0, 255)];
        let mut tree = Tree::new();
        tree[0] = PropertyDecisionNode {
            property: 1,
            count: 2,
            splitval: 128,
            child_id: 1,
            leaf_id: 0,
        };
        tree.push(PropertyDecisionNode::default());
        tree.push(PropertyDecisionNode::default());

        let mut rac = RacOutput::new(Vec::new());
        let mut coder = FinalPropertySymbolCoder::new(&ranges, &mut tree, 10);
        let high = [0, 200];

        // two pre-activation visits only tick the count down
        coder.write_int(&mut rac, &high, 0, 255, 17).unwrap();
        assert_eq!(coder.num_leaves(), 1);
        coder.write_int(&mut rac, &high, 0, 255, 17).unwrap();
        assert_eq!(coder.num_leaves(), 1);

        // the third visit finds count == 0 and splits; a zero-width symbol
        // routes without touching any chances, so right after the split both
        // children still hold the parent's exact learned state
        coder.write_uint(&mut rac, &high, 0, 0).unwrap();
        assert_eq!(coder.num_leaves(), 2);
        assert_eq!(coder.leaf(0), coder.leaf(1));

        // after activation the node routes by splitval, and the two leaves
        // adapt independently
        let low = [0, 50];
        coder.write_int(&mut rac, &low, 0, 255, 3).unwrap();
        assert_eq!(coder.num_leaves(), 2);
        assert_ne!(coder.leaf(0), coder.leaf(1));

        drop(coder);
        assert_eq!(tree[0].count, -1);
        assert_eq!(tree[1].leaf_id, 0);
        assert_eq!(tree[2].leaf_id, 1);
    }

    #[test]
    fn test_identical_inputs_give_identical_bitstreams() {
        let ranges = vec![PropertyRange::new(0, 255), PropertyRange::new(0, 255)];
        let samples: Vec<([PropertyVal; 2], i32)> = (0..200)
            .map(|i| ([(i * 37) % 256, (i * 101) % 256], (i * 7) % 200))
            .collect();

        let encode_once = || {
            let mut tree = Tree::new();
            tree[0] = PropertyDecisionNode {
                property: 0,
                count: 3,
                splitval: 128,
                child_id: 1,
                leaf_id: 0,
            };
            tree.push(PropertyDecisionNode::default());
            tree.push(PropertyDecisionNode::default());
            let mut rac = RacOutput::new(Vec::new());
            let mut coder = FinalPropertySymbolCoder::new(&ranges, &mut tree, 10);
            for (props, value) in &samples {
                coder.write_int(&mut rac, props, 0, 255, *value).unwrap();
            }
            drop(coder);
            rac.finish().unwrap()
        };

        assert_eq!(encode_once(), encode_once());
    }

    #[test]
    fn test_encode_decode_with_identical_trees() {
        use rand::{Rng, SeedableRng};

        let ranges = vec![
            PropertyRange::new(-255, 255),
            PropertyRange::new(0, 255),
            PropertyRange::new(0, 511),
        ];
        let mut initial = Tree::new();
        initial[0] = PropertyDecisionNode {
            property: 0,
            count: 4,
            splitval: 0,
            child_id: 1,
            leaf_id: 0,
        };
        initial.push(PropertyDecisionNode {
            property: 2,
            count: 16,
            splitval: 255,
            child_id: 3,
            leaf_id: 0,
        });
        initial.push(PropertyDecisionNode::default());
        initial.push(PropertyDecisionNode::default());
        initial.push(PropertyDecisionNode::default());

        let mut rng = rand::rngs::StdRng::seed_from_u64(0xF11F);
        let samples: Vec<(Vec<PropertyVal>, i32)> = (0..3000)
            .map(|_| {
                let props = vec![
                    rng.gen_range(-255..=255),
                    rng.gen_range(0..=255),
                    rng.gen_range(0..=511),
                ];
                let value = rng.gen_range(-100..=100);
                (props, value)
            })
            .collect();

        // encode: tree header, then the samples
        let mut enc_tree = initial.clone();
        let mut rac = RacOutput::new(Vec::new());
        let mut meta = MetaPropertySymbolCoder::new(ranges.clone());
        meta.write_tree(&mut rac, &enc_tree).unwrap();
        let mut coder = FinalPropertySymbolCoder::new(&ranges, &mut enc_tree, 10);
        for (props, value) in &samples {
            coder.write_int(&mut rac, props, -100, 100, *value).unwrap();
        }
        let enc_leaves = coder.num_leaves();
        drop(coder);
        let encoded = rac.finish().unwrap();

        // decode mirrors it
        let mut rac = RacInput::new(&encoded[..]).unwrap();
        let mut meta = MetaPropertySymbolCoder::new(ranges.clone());
        let mut dec_tree = Tree::new();
        meta.read_tree(&mut rac, &mut dec_tree).unwrap();
        assert_eq!(dec_tree, initial);

        let mut coder = FinalPropertySymbolCoder::new(&ranges, &mut dec_tree, 10);
        for (props, value) in &samples {
            assert_eq!(coder.read_int(&mut rac, props, -100, 100).unwrap(), *value);
        }
        assert_eq!(coder.num_leaves(), enc_leaves);
        drop(coder);

        // both sides performed the same lazy splits in the same order
        assert_eq!(dec_tree, enc_tree);
    }
}
