//! Region classification.
//!
//! Decides, per traced contour, whether it encloses a solid fill region,
//! is a true hole inside one, or is just the outline of a pen stroke.
//! Shape measures alone are not enough: solidity misclassifies annuli as
//! hollow, so the rules also consult the nesting forest and the ratio of
//! enclosed area actually filled. Thickness (area/perimeter) separates
//! thin strokes from fills, and a compactness ceiling excludes elongated
//! outlines.
//!
//! The policy is an explicit ordered rule table, first match wins, so each
//! rule can be audited and tested on its own. The thresholds are
//! empirically tuned against a corpus of schematic scans; they live in one
//! struct so a caller can re-tune without touching the rules.

use plotkit_raster::ContourForest;
use tracing::{debug, trace};

/// Tunable thresholds for the classification rules.
#[derive(Debug, Clone)]
pub struct ClassifierThresholds {
    /// Minimum effective area for fill consideration (px²).
    pub min_solid_area: f64,
    /// Minimum stroke-width proxy (area/perimeter) for a fill.
    pub min_thickness: f64,
    /// Solidity floor for parents with holes.
    pub parent_solidity: f64,
    /// Compactness ceiling for parents with holes.
    pub parent_compactness: f64,
    /// Minimum fraction of a parent's area not covered by children.
    pub parent_fill_ratio: f64,
    /// General solidity floor.
    pub solidity: f64,
    /// Solidity floor for children of non-region parents.
    pub child_solidity: f64,
    /// Compactness ceiling for children of non-region parents.
    pub child_compactness: f64,
    /// Compactness ceiling for childless contours.
    pub single_compactness: f64,
    /// Crescent exception: minimum effective area.
    pub crescent_area: f64,
    /// Crescent exception: minimum thickness.
    pub crescent_thickness: f64,
    /// Crescent exception: compactness ceiling.
    pub crescent_compactness: f64,
}

impl Default for ClassifierThresholds {
    fn default() -> Self {
        Self {
            min_solid_area: 50.0,
            min_thickness: 0.15,
            parent_solidity: 0.4,
            parent_compactness: 200.0,
            parent_fill_ratio: 0.15,
            solidity: 0.25,
            child_solidity: 0.95,
            child_compactness: 50.0,
            single_compactness: 100.0,
            crescent_area: 500.0,
            crescent_thickness: 1.5,
            crescent_compactness: 1500.0,
        }
    }
}

/// A solid fill area: boundary contour index plus its true holes.
#[derive(Debug, Clone)]
pub struct Region {
    pub boundary: usize,
    pub holes: Vec<usize>,
}

/// Verdict for one contour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Encloses a solid fill region.
    Region,
    /// A hollow outline parent; its children never become regions or holes.
    RejectedOutlineParent,
    /// Not a fill region (stroke outline, hole, or noise).
    NotRegion,
}

/// Measured and derived scalars for one contour, plus its standing in the
/// forest at evaluation time.
#[derive(Debug, Clone)]
pub struct ContourMeasures {
    pub effective_area: f64,
    pub bbox_w: f64,
    pub bbox_h: f64,
    pub solidity: f64,
    pub thickness: f64,
    pub compactness: f64,
    pub fill_ratio: f64,
    pub has_children: bool,
    pub is_child: bool,
    /// Parent was classified as a rejected outline parent.
    pub parent_rejected: bool,
    /// Parent was accepted as a fill region.
    pub parent_is_region: bool,
}

impl ContourMeasures {
    fn thin_but_long(&self) -> bool {
        (self.bbox_w < 20.0 && self.bbox_h > 15.0) || (self.bbox_h < 20.0 && self.bbox_w > 15.0)
    }

    fn crescent(&self, t: &ClassifierThresholds) -> bool {
        self.effective_area > t.crescent_area
            && self.thickness > t.crescent_thickness
            && self.compactness < t.crescent_compactness
    }
}

type Rule = fn(&ContourMeasures, &ClassifierThresholds) -> Option<Verdict>;

/// The ordered rule table. Evaluation stops at the first rule that
/// returns a verdict.
const RULES: [(&str, Rule); 8] = [
    ("below-min-area", |m, t| {
        if m.effective_area < t.min_solid_area && !m.thin_but_long() {
            Some(Verdict::NotRegion)
        } else {
            None
        }
    }),
    ("parent-with-holes", |m, t| {
        if !(m.has_children && !m.is_child) {
            return None;
        }
        let filled = m.solidity > t.parent_solidity
            && m.compactness < t.parent_compactness
            && m.fill_ratio > t.parent_fill_ratio
            && m.thickness >= t.min_thickness;
        if filled || m.crescent(t) {
            Some(Verdict::Region)
        } else {
            Some(Verdict::RejectedOutlineParent)
        }
    }),
    ("standalone-solid", |m, t| {
        if m.solidity > t.solidity
            && m.thickness >= t.min_thickness
            && !m.has_children
            && !m.is_child
        {
            Some(Verdict::Region)
        } else {
            None
        }
    }),
    ("child-of-rejected-outline", |m, t| {
        if m.solidity > t.solidity && m.thickness >= t.min_thickness && m.is_child && m.parent_rejected
        {
            Some(Verdict::NotRegion)
        } else {
            None
        }
    }),
    ("true-hole", |m, t| {
        if m.solidity > t.solidity && m.thickness >= t.min_thickness && m.is_child && m.parent_is_region
        {
            Some(Verdict::NotRegion)
        } else {
            None
        }
    }),
    ("filled-child-of-outline", |m, t| {
        if m.solidity > t.solidity && m.thickness >= t.min_thickness && m.is_child {
            if m.solidity > t.child_solidity && m.compactness < t.child_compactness {
                Some(Verdict::Region)
            } else {
                Some(Verdict::NotRegion)
            }
        } else {
            None
        }
    }),
    ("childless-compact", |m, t| {
        if m.solidity > t.solidity && m.thickness >= t.min_thickness && !m.has_children {
            if m.compactness < t.single_compactness {
                Some(Verdict::Region)
            } else {
                Some(Verdict::NotRegion)
            }
        } else {
            None
        }
    }),
    ("crescent-fallback", |m, t| {
        if !m.is_child && m.crescent(t) {
            Some(Verdict::Region)
        } else {
            Some(Verdict::NotRegion)
        }
    }),
];

/// Classifies contours into fill regions with holes.
pub struct RegionClassifier {
    thresholds: ClassifierThresholds,
}

impl RegionClassifier {
    /// Creates a classifier with the given thresholds.
    pub fn new(thresholds: ClassifierThresholds) -> Self {
        Self { thresholds }
    }

    /// Measures one contour in the forest and captures its parents'
    /// verdicts from `verdicts` (earlier contours only; the tracer
    /// guarantees parents precede children).
    fn measure(&self, forest: &ContourForest, index: usize, verdicts: &[Verdict]) -> ContourMeasures {
        let node = &forest.nodes[index];
        let area = node.area();
        let perimeter = node.perimeter();
        let hull_area = node.hull_area();
        let (_, _, bbox_w, bbox_h) = node.bounding_box();
        let bbox_area = bbox_w * bbox_h;

        let effective_area = if area > 0.0 { area } else { bbox_area };

        // Degenerate hulls never divide by zero: a shape with positive
        // area and no hull extent is treated as perfectly solid.
        let solidity = if hull_area > 0.0 {
            effective_area / hull_area
        } else if effective_area > 0.0 {
            1.0
        } else {
            0.0
        };

        // Stroke-width proxy. Slivers like underscores have ≈0 shoelace
        // area, so fall back to the short bbox dimension.
        let thickness = if area > 0.0 && perimeter > 0.0 {
            area / perimeter
        } else {
            bbox_w.min(bbox_h)
        };

        let compactness = if effective_area > 0.0 {
            perimeter * perimeter / effective_area
        } else {
            f64::INFINITY
        };

        let children = forest.children(index);
        let children_area: f64 = children.iter().map(|&c| forest.nodes[c].area()).sum();
        let fill_ratio = if effective_area > 0.0 {
            (effective_area - children_area) / effective_area
        } else {
            0.0
        };

        let parent = node.parent;
        ContourMeasures {
            effective_area,
            bbox_w,
            bbox_h,
            solidity,
            thickness,
            compactness,
            fill_ratio,
            has_children: !children.is_empty(),
            is_child: parent.is_some(),
            parent_rejected: parent
                .map(|p| verdicts[p] == Verdict::RejectedOutlineParent)
                .unwrap_or(false),
            parent_is_region: parent.map(|p| verdicts[p] == Verdict::Region).unwrap_or(false),
        }
    }

    /// Runs the rule table over one contour's measures.
    pub fn classify_measures(&self, measures: &ContourMeasures) -> (Verdict, &'static str) {
        for (name, rule) in RULES.iter() {
            if let Some(verdict) = rule(measures, &self.thresholds) {
                return (verdict, name);
            }
        }
        (Verdict::NotRegion, "no-rule")
    }

    /// Classifies the whole forest. Returns the accepted regions with
    /// their holes populated from direct children that were not
    /// independently promoted to regions.
    pub fn classify(&self, forest: &ContourForest) -> Vec<Region> {
        let mut verdicts = vec![Verdict::NotRegion; forest.len()];

        for index in 0..forest.len() {
            let measures = self.measure(forest, index, &verdicts);
            let (verdict, rule) = self.classify_measures(&measures);
            trace!(
                contour = index,
                ?verdict,
                rule,
                solidity = measures.solidity,
                thickness = measures.thickness,
                compactness = measures.compactness,
                "classified contour"
            );
            verdicts[index] = verdict;
        }

        let regions: Vec<Region> = (0..forest.len())
            .filter(|&i| verdicts[i] == Verdict::Region)
            .map(|i| Region {
                boundary: i,
                holes: forest
                    .children(i)
                    .into_iter()
                    .filter(|&c| verdicts[c] != Verdict::Region)
                    .collect(),
            })
            .collect();

        debug!(
            contours = forest.len(),
            regions = regions.len(),
            "region classification complete"
        );
        regions
    }
}
