//! Panel illustration batches and single-image edits.

use crate::call::{call_image, call_text};
use crate::config::EngineConfig;
use crate::panels::{PanelAllocator, PanelAssignment};
use crate::prompts::{image_edit_request, panel_image_request, scene_plan_request};
use crate::retry::{Generated, RetryingGenerator};
use crate::validator::{validate_scene_output, verify_illustrations};
use fabulist_core::{
    GenerationConstraints, GenerationKind, Illustration, ImageResponse, Segment,
};
use fabulist_error::{FabulistResult, StoryError, Violation, ViolationKind};
use fabulist_interface::{FabulistDriver, ImageDriver};
use futures::{StreamExt, TryStreamExt, stream};
use tracing::{debug, info, instrument};

/// Produces exactly one illustration per requested panel.
///
/// A scene is planned for every panel with one text call, then the panel
/// images are rendered concurrently. The batch is all-or-nothing: if any
/// panel fails terminally, no illustrations are returned.
pub struct ImageGenerator<'a, D: ?Sized, I: ?Sized> {
    text: &'a D,
    images: &'a I,
    config: &'a EngineConfig,
}

impl<'a, D, I> ImageGenerator<'a, D, I>
where
    D: FabulistDriver + ?Sized,
    I: ImageDriver + ?Sized,
{
    /// Create a generator over a text and an image collaborator.
    pub fn new(text: &'a D, images: &'a I, config: &'a EngineConfig) -> Self {
        Self {
            text,
            images,
            config,
        }
    }

    /// Generate `number_of_panels` illustrations for `segments`.
    ///
    /// # Errors
    ///
    /// - `CallerInputError` for an empty story, zero panels or a blank style
    /// - `GenerationExhausted` if the scene plan or any panel runs out of attempts
    /// - `ContractViolation` if the finished batch does not hold exactly one
    ///   illustration per panel
    #[instrument(skip(self, segments), fields(segments = segments.len()))]
    pub async fn generate(
        &self,
        segments: &[Segment],
        art_style: &str,
        number_of_panels: u32,
    ) -> FabulistResult<Vec<Illustration>> {
        if art_style.trim().is_empty() {
            return Err(StoryError::caller_input("art style must not be empty").into());
        }
        let assignments = PanelAllocator::allocate(segments.len(), number_of_panels)?;
        let anchors: Vec<&Segment> = assignments
            .iter()
            .map(|assignment| &segments[*assignment.anchor_index()])
            .collect();

        let scenes = self.plan_scenes(&anchors, art_style, number_of_panels).await?;

        let illustrations: Vec<Illustration> = stream::iter(assignments.iter().zip(anchors).zip(scenes))
            .map(|((assignment, anchor), scene)| {
                self.render_panel(assignment, *anchor.segment_number(), scene, art_style)
            })
            .buffered(*self.config.max_concurrent_images())
            .try_collect()
            .await?;

        verify_illustrations(&illustrations, number_of_panels)?;
        info!(illustrations = illustrations.len(), "Illustration batch generated");
        Ok(illustrations)
    }

    /// One scene per panel, validated as exactly `number_of_panels` scenes.
    #[instrument(skip(self, anchors, art_style))]
    async fn plan_scenes(
        &self,
        anchors: &[&Segment],
        art_style: &str,
        number_of_panels: u32,
    ) -> FabulistResult<Vec<String>> {
        let constraints = GenerationConstraints::new(
            GenerationKind::ScenePlan,
            self.config.attempts_for(GenerationKind::ScenePlan),
        )
        .with_expected_panels(number_of_panels);
        let generator = RetryingGenerator::from_constraints(&constraints)?
            .with_feedback(*self.config.feedback_on_retry());

        let generated = generator
            .run(
                |hint| {
                    let request = scene_plan_request(self.config, anchors, art_style, hint.as_ref());
                    async move { call_text(self.text, &request, self.config.text_timeout()).await }
                },
                |raw| validate_scene_output(&raw, &constraints),
            )
            .await?;

        debug!(attempts = generated.attempts(), "Scene plan accepted");
        Ok(generated.into_value())
    }

    /// Render one panel under its own attempt budget.
    #[instrument(skip(self, assignment, scene, art_style), fields(panel = assignment.panel_number()))]
    async fn render_panel(
        &self,
        assignment: &PanelAssignment,
        segment_number: u32,
        scene: String,
        art_style: &str,
    ) -> FabulistResult<Illustration> {
        let generator = RetryingGenerator::new(
            GenerationKind::PanelImage,
            self.config.attempts_for(GenerationKind::PanelImage),
        )
        .with_feedback(*self.config.feedback_on_retry());

        let generated = generator
            .run(
                |hint| {
                    let request = panel_image_request(&scene, art_style, hint.as_ref());
                    async move { call_image(self.images, &request, self.config.image_timeout()).await }
                },
                require_image,
            )
            .await?;

        let (mime, source) = generated.into_value().into_parts();
        Ok(Illustration::new(
            *assignment.panel_number(),
            segment_number,
            scene,
            mime,
            source,
        ))
    }
}

/// Replaces one illustration with a modified version of itself.
pub struct ImageRegenerator<'a, I: ?Sized> {
    images: &'a I,
    config: &'a EngineConfig,
}

impl<'a, I> ImageRegenerator<'a, I>
where
    I: ImageDriver + ?Sized,
{
    /// Create a regenerator over an image collaborator.
    pub fn new(images: &'a I, config: &'a EngineConfig) -> Self {
        Self { images, config }
    }

    /// Produce a new image for the same panel from the original and a request.
    ///
    /// The result keeps the original's panel and segment numbers. Nothing
    /// partial is ever returned.
    ///
    /// # Errors
    ///
    /// - `CallerInputError` for a blank request or an original with no image
    /// - `GenerationExhausted` when no image is produced in budget
    #[instrument(skip(self, original, user_request), fields(panel = original.panel_number()))]
    pub async fn regenerate(
        &self,
        original: &Illustration,
        user_request: &str,
    ) -> FabulistResult<Generated<Illustration>> {
        if user_request.trim().is_empty() {
            return Err(StoryError::caller_input("modification request must not be empty").into());
        }
        if original.source().is_empty() {
            return Err(StoryError::caller_input(format!(
                "illustration for panel {} has no image to modify",
                original.panel_number()
            ))
            .into());
        }

        let generator = RetryingGenerator::new(
            GenerationKind::ImageEdit,
            self.config.attempts_for(GenerationKind::ImageEdit),
        )
        .with_feedback(*self.config.feedback_on_retry());

        let generated = generator
            .run(
                |hint| {
                    let request = image_edit_request(original, user_request, hint.as_ref());
                    async move { call_image(self.images, &request, self.config.image_timeout()).await }
                },
                require_image,
            )
            .await?;

        info!(attempts = generated.attempts(), "Illustration regenerated");
        let scene = format!("{} ({})", original.scene(), user_request.trim());
        Ok(generated.map(|response| {
            let (mime, source) = response.into_parts();
            original.with_image(scene, mime, source)
        }))
    }
}

fn require_image(response: ImageResponse) -> Result<ImageResponse, Violation> {
    if response.source().is_empty() {
        return Err(Violation::new(
            ViolationKind::EmptyStructure,
            "image collaborator returned no image data",
        ));
    }
    Ok(response)
}
