//! The linked entity kinds of the corpus graph.
//!
//! A [`Video`] owns its documents, frames and a per-video page arena; a
//! [`Document`] addresses its pages by [`PageId`] into that arena, a
//! [`Frame`] owns its screens and a [`Screen`] owns its cross-references.
//! Back-references are index newtypes into the owning collections, never
//! owning links, so the graph stays acyclic by ownership while remaining
//! navigable in both directions.
//!
//! All entities are immutable once built. The derived facts on a screen
//! (`is_beyond_bounds`, `matching_pages`) are materialized during
//! construction and never recomputed.

use crate::core::{CorpusError, CorpusResult};
use crate::corpus::node::AnnotationNode;
use crate::domain::{BoundingQuadrilateral, Coordinate, ScreenCondition, Similarity};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};

/// Index of a document within its video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(pub usize);

/// Index of a page within its video's page arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageId(pub usize);

/// Index of a frame within its video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(pub usize);

/// A single annotated video.
#[derive(Debug, Clone)]
pub struct Video {
    /// Directory holding the video's frame and page files.
    pub dirname: PathBuf,
    /// Frame rate of the video, in frames per second.
    pub fps: u32,
    /// Declared number of frames in the full video.
    pub frames_num: u32,
    /// Pixel width of the video.
    pub width: u32,
    /// Pixel height of the video.
    pub height: u32,
    /// URI of the video source.
    pub uri: String,
    /// The documents projected during the video.
    pub documents: Vec<Document>,
    /// Page arena; pages of all documents in document order.
    pub pages: Vec<Page>,
    /// The annotated frames of the video.
    pub frames: Vec<Frame>,
    /// Lookup table from page key to page id. Keys are unique within the
    /// video; upstream schema validation guarantees there are no collisions.
    pub page_keys: HashMap<String, PageId>,
}

/// A document projected during a video.
#[derive(Debug, Clone)]
pub struct Document {
    /// Path of the document file.
    pub filename: PathBuf,
    /// The document's pages, in source order, by id into the video arena.
    pub pages: Vec<PageId>,
}

/// A page in a document.
#[derive(Debug, Clone)]
pub struct Page {
    /// Path of the page image file.
    pub filename: PathBuf,
    /// Key identifying the page within its video.
    pub key: String,
    /// Page number within the document.
    pub number: u32,
    /// Opaque descriptor vector attached by the annotation pipeline.
    pub descriptor: Vec<f32>,
    /// The document the page belongs to.
    pub document: DocumentId,
}

/// An annotated video frame.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Path of the frame image file.
    pub filename: PathBuf,
    /// Frame number within the video.
    pub number: u32,
    /// Opaque descriptor vector attached by the annotation pipeline.
    pub descriptor: Vec<f32>,
    /// The screens detected on the frame.
    pub screens: Vec<Screen>,
}

/// A screen detected on a video frame.
#[derive(Debug, Clone)]
pub struct Screen {
    /// The frame the screen was detected on.
    pub frame: FrameId,
    /// Recording condition of the screen.
    pub condition: ScreenCondition,
    /// Opaque descriptor vector attached by the annotation pipeline.
    pub descriptor: Vec<f32>,
    /// Bounding quadrilateral of the screen in frame coordinates.
    pub bounds: BoundingQuadrilateral,
    /// Whether any corner of the bounds lies outside the video frame.
    /// Derived once at construction.
    pub is_beyond_bounds: bool,
    /// Cross-references from this screen to document pages.
    pub keyrefs: Vec<KeyRef>,
    /// The pages this screen corresponds to: pages referenced with full
    /// similarity, or every referenced page when no full match exists.
    /// Derived once at construction.
    pub matching_pages: BTreeSet<PageId>,
}

/// An is-displayed-on relation between a screen and a document page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRef {
    /// Similarity grade of the relation.
    pub similarity: Similarity,
    /// The referenced page, resolved against the owning video's key table.
    pub page: PageId,
}

/// Toggle set parameterizing the outlier predicate.
///
/// Each toggle independently enables one exclusion condition; a screen is an
/// outlier if any enabled condition holds for it. The five toggles fully
/// characterize an outlier and every one defaults to enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutlierFlags {
    /// Exclude screens that display windowed content.
    pub windowed: bool,
    /// Exclude screens obscured by an obstacle.
    pub obstacle: bool,
    /// Exclude screens that go beyond the bounds of the video.
    pub beyond_bounds: bool,
    /// Exclude screens that have cross-references but no fully matching page.
    pub incremental: bool,
    /// Exclude screens with no cross-references at all.
    pub no_match: bool,
}

impl Default for OutlierFlags {
    fn default() -> Self {
        Self {
            windowed: true,
            obstacle: true,
            beyond_bounds: true,
            incremental: true,
            no_match: true,
        }
    }
}

impl OutlierFlags {
    /// Returns a toggle set with every condition disabled.
    pub fn none() -> Self {
        Self {
            windowed: false,
            obstacle: false,
            beyond_bounds: false,
            incremental: false,
            no_match: false,
        }
    }
}

impl Video {
    /// Builds a video and its whole subtree from an annotation node.
    ///
    /// Pages are built and indexed before any frame: a cross-reference may
    /// legally point at a page defined later in the source than the
    /// referencing screen, so the key table must be complete before keyref
    /// resolution starts.
    pub(crate) fn from_node(dataset_dirname: &Path, node: &AnnotationNode) -> CorpusResult<Video> {
        let dirname = dataset_dirname.join(node.attr("dirname")?);
        let fps = node.parse_attr("fps")?;
        let frames_num = node.parse_attr("frames")?;
        let width = node.parse_attr("width")?;
        let height = node.parse_attr("height")?;
        let uri = node.attr("uri")?.to_string();

        let mut documents = Vec::new();
        let mut pages = Vec::new();
        let mut page_keys = HashMap::new();
        for document_node in node.descendants_named("document") {
            let document_id = DocumentId(documents.len());
            let filename = dirname.join(document_node.attr("filename")?);
            let mut page_ids = Vec::new();
            for page_node in document_node.descendants_named("page") {
                let page_id = PageId(pages.len());
                let page = Page::from_node(&dirname, document_id, page_node)?;
                page_keys.insert(page.key.clone(), page_id);
                page_ids.push(page_id);
                pages.push(page);
            }
            documents.push(Document {
                filename,
                pages: page_ids,
            });
        }

        let mut frames = Vec::new();
        for frame_node in node.descendants_named("frame") {
            let frame_id = FrameId(frames.len());
            frames.push(Frame::from_node(
                &dirname, frame_id, width, height, &page_keys, frame_node,
            )?);
        }

        Ok(Video {
            dirname,
            fps,
            frames_num,
            width,
            height,
            uri,
            documents,
            pages,
            frames,
            page_keys,
        })
    }

    /// Returns the page with the given id.
    pub fn page(&self, id: PageId) -> &Page {
        &self.pages[id.0]
    }

    /// Returns the document with the given id.
    pub fn document(&self, id: DocumentId) -> &Document {
        &self.documents[id.0]
    }

    /// Returns the frame with the given id.
    pub fn frame(&self, id: FrameId) -> &Frame {
        &self.frames[id.0]
    }

    /// Looks up a page by its key.
    pub fn page_by_key(&self, key: &str) -> Option<&Page> {
        self.page_keys.get(key).map(|id| &self.pages[id.0])
    }

    /// Iterates over all screens of the video, in frame order.
    pub fn screens(&self) -> impl Iterator<Item = &Screen> {
        self.frames.iter().flat_map(|frame| frame.screens.iter())
    }

    /// Iterates over all cross-references of the video, in screen order.
    pub fn keyrefs(&self) -> impl Iterator<Item = &KeyRef> {
        self.screens().flat_map(|screen| screen.keyrefs.iter())
    }
}

impl fmt::Display for Video {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "video {}", self.dirname.display())
    }
}

impl Page {
    fn from_node(
        video_dirname: &Path,
        document: DocumentId,
        node: &AnnotationNode,
    ) -> CorpusResult<Page> {
        Ok(Page {
            filename: video_dirname.join(node.attr("filename")?),
            key: node.attr("key")?.to_string(),
            number: node.parse_attr("number")?,
            descriptor: node.descriptor_attr("vgg256")?,
            document,
        })
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "page {}", self.filename.display())
    }
}

impl Frame {
    fn from_node(
        video_dirname: &Path,
        frame_id: FrameId,
        width: u32,
        height: u32,
        page_keys: &HashMap<String, PageId>,
        node: &AnnotationNode,
    ) -> CorpusResult<Frame> {
        let filename = video_dirname.join(node.attr("filename")?);
        let number = node.parse_attr("number")?;
        let descriptor = node.descriptor_attr("vgg256")?;

        let mut screens = Vec::new();
        for screen_node in node.descendants_named("screen") {
            screens.push(Screen::from_node(
                frame_id,
                width,
                height,
                page_keys,
                video_dirname,
                screen_node,
            )?);
        }

        Ok(Frame {
            filename,
            number,
            descriptor,
            screens,
        })
    }
}

impl Screen {
    fn from_node(
        frame: FrameId,
        width: u32,
        height: u32,
        page_keys: &HashMap<String, PageId>,
        video_dirname: &Path,
        node: &AnnotationNode,
    ) -> CorpusResult<Screen> {
        let condition = node.parse_attr("condition")?;
        let descriptor = node.descriptor_attr("vgg256")?;
        let bounds = BoundingQuadrilateral::new(
            Coordinate::new(node.parse_attr("x0")?, node.parse_attr("y0")?),
            Coordinate::new(node.parse_attr("x1")?, node.parse_attr("y1")?),
            Coordinate::new(node.parse_attr("x2")?, node.parse_attr("y2")?),
            Coordinate::new(node.parse_attr("x3")?, node.parse_attr("y3")?),
        );
        let is_beyond_bounds = bounds.is_beyond_bounds(width, height);

        let mut keyrefs = Vec::new();
        for keyref_node in node.descendants_named("keyref") {
            keyrefs.push(KeyRef::from_node(page_keys, video_dirname, keyref_node)?);
        }
        let matching_pages = derive_matching_pages(&keyrefs);

        Ok(Screen {
            frame,
            condition,
            descriptor,
            bounds,
            is_beyond_bounds,
            keyrefs,
            matching_pages,
        })
    }

    /// Returns whether any cross-reference of this screen carries the full
    /// similarity grade.
    pub fn has_full_match(&self) -> bool {
        self.keyrefs
            .iter()
            .any(|keyref| keyref.similarity == Similarity::Full)
    }

    /// Returns whether the screen is an outlier under the given toggle set.
    ///
    /// The predicate is an OR over the enabled conditions and short-circuits
    /// on the first one that holds. A screen satisfying no enabled condition
    /// is not an outlier.
    pub fn is_outlier(&self, flags: OutlierFlags) -> bool {
        if flags.windowed && self.condition == ScreenCondition::Windowed {
            return true;
        }
        if flags.obstacle && self.condition == ScreenCondition::Obstacle {
            return true;
        }
        if flags.beyond_bounds && self.is_beyond_bounds {
            return true;
        }
        if flags.incremental && !self.keyrefs.is_empty() && !self.has_full_match() {
            return true;
        }
        if flags.no_match && self.keyrefs.is_empty() {
            return true;
        }
        false
    }
}

impl KeyRef {
    fn from_node(
        page_keys: &HashMap<String, PageId>,
        video_dirname: &Path,
        node: &AnnotationNode,
    ) -> CorpusResult<KeyRef> {
        let similarity = node.parse_attr("similarity")?;
        let key = node.text().ok_or_else(|| CorpusError::Structural {
            element: node.name().to_string(),
            attribute: "key".to_string(),
            message: "missing element text holding the page key".to_string(),
            source: None,
        })?;
        let page = *page_keys
            .get(key)
            .ok_or_else(|| CorpusError::unresolved_key(key, video_dirname.display().to_string()))?;
        Ok(KeyRef { similarity, page })
    }
}

/// Computes the set of pages a screen corresponds to.
///
/// Pages referenced with full similarity win; when there is no full match,
/// any referenced page is accepted; a screen without cross-references
/// corresponds to no page.
fn derive_matching_pages(keyrefs: &[KeyRef]) -> BTreeSet<PageId> {
    let full: BTreeSet<PageId> = keyrefs
        .iter()
        .filter(|keyref| keyref.similarity == Similarity::Full)
        .map(|keyref| keyref.page)
        .collect();
    if full.is_empty() {
        keyrefs.iter().map(|keyref| keyref.page).collect()
    } else {
        full
    }
}
