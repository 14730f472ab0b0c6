//! Prompt flows: each pairs a fixed prompt with a declared output schema.

pub mod describe;
pub mod identify;

pub use describe::{
    DESCRIBE_PROMPT, DescribedFont, SuggestFontsInput, SuggestFontsOutput,
    suggest_fonts_from_description,
};
pub use identify::{
    FontSuggestion, FontSuggestions, IDENTIFY_PROMPT, IdentifyFontInput,
    identify_font_from_image,
};
