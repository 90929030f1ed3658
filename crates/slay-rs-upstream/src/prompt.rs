//! Prompt templates for the Y2K transformation.

/// Instructions sent with the uploaded image to the vision model.
pub const ANALYSIS_INSTRUCTIONS: &str = "Analyze this image for Y2K glam transformation. \
Identify: 1) WHAT is the main subject (person, animal, object, etc.), \
2) POSITION/POSE (sitting, standing, lying, angle, orientation), \
3) KEY FEATURES (colors, textures, distinctive elements), \
4) SETTING/BACKGROUND. Be specific about the pose/position as this must be maintained. \
Describe in under 120 words for any subject type.";

/// Build the generation prompt for an analyzed upload.
///
/// The analysis is quoted verbatim; the rest asks for the same pose with
/// subject-appropriate Y2K styling.
pub fn transformation_prompt(analysis: &str) -> String {
    let analysis = analysis.trim().replace('"', "'");
    format!(
        "Transform this subject into Y2K girly glam based on: \"{analysis}\".

CRITICAL: Maintain the EXACT same position, pose, angle, and orientation as described.

Apply Y2K girly transformation appropriate to the subject:

FOR PEOPLE: Glamorous Y2K makeup (sparkly lashes, glossy pink lips, shimmery eyeshadow), butterfly hair clips, chunky hoops, choker, metallic crop top, colorful hair streaks (pink/purple/blue).

FOR ANIMALS: Glittery fur/feathers with pink and purple highlights, sparkly accessories (tiny butterfly clips, glittery collars, holographic elements), Y2K-style backgrounds.

FOR OBJECTS: Holographic/iridescent surfaces, pink and purple color scheme, glittery textures, metallic finishes, Y2K decorative elements (butterflies, stars, hearts), sparkly embellishments.

UNIVERSAL Y2K ELEMENTS: Dreamy soft lighting with pink/purple glow, magical sparkles floating around, subtle holographic effects, Y2K pattern backgrounds (gradient mesh, butterflies, stars), maximum glitter and shine.

Style: High quality, detailed, vibrant Y2K aesthetic, super girly and cute with maximum sparkle. Keep the subject recognizable but completely glammed up in Y2K style."
    )
}
