//! The dataset root: one-pass construction of the whole entity graph.
//!
//! [`Dataset::from_node`] walks a validated annotation tree once, building
//! every video bottom-up, and returns the fully linked graph. Construction
//! either succeeds completely or fails with a structural or referential
//! error; no partial graph is ever exposed. After construction the graph is
//! read-only, so concurrent consumers may share it freely.

use crate::core::CorpusResult;
use crate::corpus::entities::{Document, Frame, KeyRef, Page, Screen, Video};
use crate::corpus::node::AnnotationNode;
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, info};

/// The entire annotated corpus.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Root directory of the corpus on disk.
    pub dirname: PathBuf,
    /// The annotated videos, in source order.
    pub videos: Vec<Video>,
}

impl Dataset {
    /// Builds the entity graph from the root node of a validated annotation
    /// tree.
    ///
    /// The tree is walked once; videos and their subtrees are constructed
    /// bottom-up. File paths are joined relative to `dirname` but never
    /// opened.
    ///
    /// # Errors
    ///
    /// Returns a structural error if a required attribute is missing or
    /// malformed, or a referential error if a cross-reference key does not
    /// resolve within its video.
    pub fn from_node(dirname: impl Into<PathBuf>, root: &AnnotationNode) -> CorpusResult<Dataset> {
        let dirname = dirname.into();
        debug!("processing the annotation tree at {}", dirname.display());

        let mut videos = Vec::new();
        for video_node in root.descendants_named("video") {
            videos.push(Video::from_node(&dirname, video_node)?);
        }
        let dataset = Dataset { dirname, videos };

        let non_matched = dataset
            .screens()
            .filter(|screen| screen.matching_pages.is_empty())
            .count();
        info!(
            "processed the dataset: {} videos containing {} frames with {} screens ({} non-matched) and {} keyrefs",
            dataset.videos.len(),
            dataset.frames().count(),
            dataset.screens().count(),
            non_matched,
            dataset.keyrefs().count(),
        );
        info!(
            "the dataset has {} documents containing {} pages",
            dataset.documents().count(),
            dataset.pages().count(),
        );
        Ok(dataset)
    }

    /// Iterates over all documents in the corpus, in video order.
    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.videos.iter().flat_map(|video| video.documents.iter())
    }

    /// Iterates over all pages in the corpus, in video order.
    pub fn pages(&self) -> impl Iterator<Item = &Page> {
        self.videos.iter().flat_map(|video| video.pages.iter())
    }

    /// Iterates over all frames in the corpus, in video order.
    pub fn frames(&self) -> impl Iterator<Item = &Frame> {
        self.videos.iter().flat_map(|video| video.frames.iter())
    }

    /// Iterates over all screens in the corpus, in video order.
    pub fn screens(&self) -> impl Iterator<Item = &Screen> {
        self.videos.iter().flat_map(|video| video.screens())
    }

    /// Iterates over all cross-references in the corpus, in video order.
    pub fn keyrefs(&self) -> impl Iterator<Item = &KeyRef> {
        self.videos.iter().flat_map(|video| video.keyrefs())
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dataset {}", self.dirname.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CorpusError;
    use crate::corpus::entities::{OutlierFlags, PageId};
    use crate::domain::{Coordinate, ScreenCondition, Similarity};
    use std::collections::BTreeSet;
    use std::path::Path;

    fn page_node(key: &str, number: &str) -> AnnotationNode {
        AnnotationNode::new("page")
            .with_attr("filename", format!("{key}.png"))
            .with_attr("key", key)
            .with_attr("number", number)
            .with_attr("vgg256", "[0.0, 1.0]")
    }

    fn screen_node(corners: [(i32, i32); 4]) -> AnnotationNode {
        AnnotationNode::new("screen")
            .with_attr("condition", "normal")
            .with_attr("vgg256", "[0.5, 0.5]")
            .with_attr("x0", corners[0].0.to_string())
            .with_attr("y0", corners[0].1.to_string())
            .with_attr("x1", corners[1].0.to_string())
            .with_attr("y1", corners[1].1.to_string())
            .with_attr("x2", corners[2].0.to_string())
            .with_attr("y2", corners[2].1.to_string())
            .with_attr("x3", corners[3].0.to_string())
            .with_attr("y3", corners[3].1.to_string())
    }

    fn keyref_node(key: &str, similarity: &str) -> AnnotationNode {
        AnnotationNode::new("keyref")
            .with_attr("similarity", similarity)
            .with_text(key)
    }

    /// One video, one document with one page "p1", one frame with one screen
    /// cross-referencing "p1" with full similarity. Wrapper elements mirror
    /// the nesting of the annotation schema.
    fn minimal_video_node(dirname: &str) -> AnnotationNode {
        AnnotationNode::new("video")
            .with_attr("dirname", dirname)
            .with_attr("fps", "25")
            .with_attr("frames", "1500")
            .with_attr("width", "200")
            .with_attr("height", "100")
            .with_attr("uri", format!("https://example.com/{dirname}"))
            .with_child(
                AnnotationNode::new("documents").with_child(
                    AnnotationNode::new("document")
                        .with_attr("filename", "slides.pdf")
                        .with_child(page_node("p1", "1")),
                ),
            )
            .with_child(
                AnnotationNode::new("frames").with_child(
                    AnnotationNode::new("frame")
                        .with_attr("filename", "frame000123.png")
                        .with_attr("number", "123")
                        .with_attr("vgg256", "[1.0, 2.0]")
                        .with_child(
                            AnnotationNode::new("screens").with_child(
                                screen_node([(5, 5), (50, 5), (5, 50), (50, 50)]).with_child(
                                    AnnotationNode::new("keyrefs")
                                        .with_child(keyref_node("p1", "full")),
                                ),
                            ),
                        ),
                ),
            )
    }

    #[test]
    fn test_end_to_end_minimal_dataset() {
        let root = AnnotationNode::new("dataset").with_child(minimal_video_node("lecture-01"));
        let dataset = Dataset::from_node("/corpus", &root).unwrap();

        assert_eq!(dataset.videos.len(), 1);
        let video = &dataset.videos[0];
        assert_eq!(video.dirname, Path::new("/corpus/lecture-01"));
        assert_eq!((video.width, video.height), (200, 100));
        assert_eq!(video.fps, 25);
        assert_eq!(video.frames_num, 1500);
        assert_eq!(video.pages.len(), 1);
        assert_eq!(video.pages[0].filename, Path::new("/corpus/lecture-01/p1.png"));
        assert_eq!(video.documents[0].pages, vec![PageId(0)]);

        let screens: Vec<_> = video.screens().collect();
        assert_eq!(screens.len(), 1);
        let screen = screens[0];
        assert_eq!(screen.condition, ScreenCondition::Normal);
        assert_eq!(screen.bounds.top_left, Coordinate::new(5, 5));
        assert_eq!(screen.bounds.bottom_right, Coordinate::new(50, 50));
        assert!(!screen.is_beyond_bounds);
        assert_eq!(screen.keyrefs.len(), 1);
        assert_eq!(screen.keyrefs[0].similarity, Similarity::Full);
        assert_eq!(screen.matching_pages, BTreeSet::from([PageId(0)]));
        assert!(!screen.is_outlier(OutlierFlags::default()));

        assert_eq!(video.page_by_key("p1").unwrap().key, "p1");
        assert_eq!(dataset.keyrefs().count(), 1);
    }

    #[test]
    fn test_page_keys_are_scoped_per_video() {
        // Two videos may reuse the same page key without conflict; each
        // keyref resolves against its own video's table.
        let root = AnnotationNode::new("dataset")
            .with_child(minimal_video_node("lecture-01"))
            .with_child(minimal_video_node("lecture-02"));
        let dataset = Dataset::from_node("/corpus", &root).unwrap();

        assert_eq!(dataset.videos.len(), 2);
        for video in &dataset.videos {
            let page = video.page_by_key("p1").unwrap();
            assert!(page.filename.starts_with(&video.dirname));
            let screen = video.screens().next().unwrap();
            assert_eq!(video.page(*screen.matching_pages.iter().next().unwrap()).key, "p1");
        }
    }

    #[test]
    fn test_keyref_may_point_at_a_later_document() {
        // The referenced page lives in a second document that appears after
        // the frames in the source; resolution must still succeed because
        // the whole page table is built before any frame.
        let root = AnnotationNode::new("dataset").with_child(
            AnnotationNode::new("video")
                .with_attr("dirname", "lecture-03")
                .with_attr("fps", "25")
                .with_attr("frames", "10")
                .with_attr("width", "200")
                .with_attr("height", "100")
                .with_attr("uri", "https://example.com/lecture-03")
                .with_child(
                    AnnotationNode::new("frames").with_child(
                        AnnotationNode::new("frame")
                            .with_attr("filename", "frame.png")
                            .with_attr("number", "1")
                            .with_attr("vgg256", "[0.0]")
                            .with_child(
                                screen_node([(5, 5), (50, 5), (5, 50), (50, 50)])
                                    .with_child(keyref_node("late", "full")),
                            ),
                    ),
                )
                .with_child(
                    AnnotationNode::new("documents").with_child(
                        AnnotationNode::new("document")
                            .with_attr("filename", "late.pdf")
                            .with_child(page_node("late", "1")),
                    ),
                ),
        );
        let dataset = Dataset::from_node("/corpus", &root).unwrap();
        let video = &dataset.videos[0];
        let screen = video.screens().next().unwrap();
        assert_eq!(video.page(screen.keyrefs[0].page).key, "late");
    }

    #[test]
    fn test_unresolved_keyref_is_a_referential_error() {
        let root = AnnotationNode::new("dataset").with_child(
            minimal_video_node("lecture-01").with_child(
                AnnotationNode::new("frames").with_child(
                    AnnotationNode::new("frame")
                        .with_attr("filename", "frame2.png")
                        .with_attr("number", "2")
                        .with_attr("vgg256", "[0.0]")
                        .with_child(
                            screen_node([(5, 5), (50, 5), (5, 50), (50, 50)])
                                .with_child(keyref_node("missing", "full")),
                        ),
                ),
            ),
        );
        let error = Dataset::from_node("/corpus", &root).unwrap_err();
        assert!(matches!(
            error,
            CorpusError::Referential { ref key, ref video }
                if key == "missing" && video.contains("lecture-01")
        ));
    }

    #[test]
    fn test_missing_attribute_is_a_structural_error() {
        let root = AnnotationNode::new("dataset").with_child(
            AnnotationNode::new("video")
                .with_attr("dirname", "lecture-01")
                .with_attr("frames", "10")
                .with_attr("width", "200")
                .with_attr("height", "100")
                .with_attr("uri", "https://example.com/lecture-01"),
        );
        let error = Dataset::from_node("/corpus", &root).unwrap_err();
        assert!(matches!(
            error,
            CorpusError::Structural { ref element, ref attribute, .. }
                if element == "video" && attribute == "fps"
        ));
    }

    #[test]
    fn test_malformed_attribute_is_a_structural_error() {
        let root = AnnotationNode::new("dataset")
            .with_child(minimal_video_node("lecture-01").with_attr("width", "wide"));
        assert!(matches!(
            Dataset::from_node("/corpus", &root),
            Err(CorpusError::Structural { .. })
        ));
    }

    #[test]
    fn test_unknown_condition_is_a_structural_error() {
        let root = AnnotationNode::new("dataset").with_child(
            minimal_video_node("lecture-01").with_child(
                AnnotationNode::new("frame")
                    .with_attr("filename", "frame3.png")
                    .with_attr("number", "3")
                    .with_attr("vgg256", "[0.0]")
                    .with_child(
                        screen_node([(0, 0), (10, 0), (0, 10), (10, 10)])
                            .with_attr("condition", "mirrored"),
                    ),
            ),
        );
        let error = Dataset::from_node("/corpus", &root).unwrap_err();
        assert!(matches!(
            error,
            CorpusError::Structural { ref element, ref attribute, .. }
                if element == "screen" && attribute == "condition"
        ));
    }

    #[test]
    fn test_screen_beyond_video_bounds_is_derived_at_construction() {
        // Right edge at x = width is out of bounds.
        let root = AnnotationNode::new("dataset").with_child(
            minimal_video_node("lecture-01").with_child(
                AnnotationNode::new("frame")
                    .with_attr("filename", "frame4.png")
                    .with_attr("number", "4")
                    .with_attr("vgg256", "[0.0]")
                    .with_child(screen_node([(0, 0), (200, 0), (0, 99), (199, 99)])),
            ),
        );
        let dataset = Dataset::from_node("/corpus", &root).unwrap();
        let video = &dataset.videos[0];
        let beyond: Vec<bool> = video.screens().map(|s| s.is_beyond_bounds).collect();
        assert_eq!(beyond, vec![false, true]);
    }
}
