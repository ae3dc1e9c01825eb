//! CSS Property Database
//!
//! Known property names, their priority group, shorthand/longhand
//! relationships, and the unit rules used for numeric values.

use std::sync::LazyLock;

use rustc_hash::{FxHashMap, FxHashSet};

/// Priority group of a property. Earlier groups sort first in emitted CSS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PropertyGroup {
    Layout,
    Flexbox,
    Grid,
    BoxSize,
    BoxSpacing,
    Position,
    Typography,
    Color,
    Border,
    Effects,
    Interactivity,
    Misc,
}

impl PropertyGroup {
    /// Position of the group in the cascade order
    pub fn rank(&self) -> u32 {
        *self as u32
    }
}

/// Whether a property sets other properties
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PropertyTier {
    /// Shorthand whose longhands include further shorthands (e.g. `border`)
    ShorthandOfShorthands,
    /// Shorthand of longhands only (e.g. `margin`)
    Shorthand,
    Longhand,
}

use PropertyGroup::*;

const PROPERTY_TABLE: &[(&str, PropertyGroup)] = &[
    // Layout
    ("display", Layout),
    ("visibility", Layout),
    ("float", Layout),
    ("clear", Layout),
    ("overflow", Layout),
    ("overflow-x", Layout),
    ("overflow-y", Layout),
    ("overflow-block", Layout),
    ("overflow-inline", Layout),
    ("overflow-clip-margin", Layout),
    ("contain", Layout),
    ("content-visibility", Layout),
    ("contain-intrinsic-size", Layout),
    ("container", Layout),
    ("container-name", Layout),
    ("container-type", Layout),
    ("isolation", Layout),
    ("columns", Layout),
    ("column-count", Layout),
    ("column-width", Layout),
    ("column-fill", Layout),
    ("column-span", Layout),
    ("column-rule", Layout),
    ("column-rule-width", Layout),
    ("column-rule-style", Layout),
    ("column-rule-color", Layout),
    ("table-layout", Layout),
    ("caption-side", Layout),
    ("empty-cells", Layout),
    ("object-fit", Layout),
    ("object-position", Layout),
    ("box-decoration-break", Layout),
    ("break-before", Layout),
    ("break-after", Layout),
    ("break-inside", Layout),
    // Flexbox
    ("flex", Flexbox),
    ("flex-direction", Flexbox),
    ("flex-wrap", Flexbox),
    ("flex-flow", Flexbox),
    ("flex-grow", Flexbox),
    ("flex-shrink", Flexbox),
    ("flex-basis", Flexbox),
    ("order", Flexbox),
    ("justify-content", Flexbox),
    ("justify-items", Flexbox),
    ("justify-self", Flexbox),
    ("align-content", Flexbox),
    ("align-items", Flexbox),
    ("align-self", Flexbox),
    ("place-content", Flexbox),
    ("place-items", Flexbox),
    ("place-self", Flexbox),
    ("gap", Flexbox),
    ("row-gap", Flexbox),
    ("column-gap", Flexbox),
    // Grid
    ("grid", Grid),
    ("grid-template", Grid),
    ("grid-template-columns", Grid),
    ("grid-template-rows", Grid),
    ("grid-template-areas", Grid),
    ("grid-area", Grid),
    ("grid-row", Grid),
    ("grid-row-start", Grid),
    ("grid-row-end", Grid),
    ("grid-column", Grid),
    ("grid-column-start", Grid),
    ("grid-column-end", Grid),
    ("grid-auto-flow", Grid),
    ("grid-auto-columns", Grid),
    ("grid-auto-rows", Grid),
    // Box size
    ("width", BoxSize),
    ("height", BoxSize),
    ("min-width", BoxSize),
    ("min-height", BoxSize),
    ("max-width", BoxSize),
    ("max-height", BoxSize),
    ("inline-size", BoxSize),
    ("block-size", BoxSize),
    ("min-inline-size", BoxSize),
    ("max-inline-size", BoxSize),
    ("min-block-size", BoxSize),
    ("max-block-size", BoxSize),
    ("box-sizing", BoxSize),
    ("aspect-ratio", BoxSize),
    ("field-sizing", BoxSize),
    // Box spacing
    ("margin", BoxSpacing),
    ("margin-top", BoxSpacing),
    ("margin-right", BoxSpacing),
    ("margin-bottom", BoxSpacing),
    ("margin-left", BoxSpacing),
    ("margin-inline", BoxSpacing),
    ("margin-inline-start", BoxSpacing),
    ("margin-inline-end", BoxSpacing),
    ("margin-block", BoxSpacing),
    ("margin-block-start", BoxSpacing),
    ("margin-block-end", BoxSpacing),
    ("padding", BoxSpacing),
    ("padding-top", BoxSpacing),
    ("padding-right", BoxSpacing),
    ("padding-bottom", BoxSpacing),
    ("padding-left", BoxSpacing),
    ("padding-inline", BoxSpacing),
    ("padding-inline-start", BoxSpacing),
    ("padding-inline-end", BoxSpacing),
    ("padding-block", BoxSpacing),
    ("padding-block-start", BoxSpacing),
    ("padding-block-end", BoxSpacing),
    ("scroll-margin", BoxSpacing),
    ("scroll-margin-top", BoxSpacing),
    ("scroll-margin-right", BoxSpacing),
    ("scroll-margin-bottom", BoxSpacing),
    ("scroll-margin-left", BoxSpacing),
    ("scroll-padding", BoxSpacing),
    ("scroll-padding-top", BoxSpacing),
    ("scroll-padding-right", BoxSpacing),
    ("scroll-padding-bottom", BoxSpacing),
    ("scroll-padding-left", BoxSpacing),
    // Position
    ("position", Position),
    ("top", Position),
    ("right", Position),
    ("bottom", Position),
    ("left", Position),
    ("inset", Position),
    ("inset-inline", Position),
    ("inset-inline-start", Position),
    ("inset-inline-end", Position),
    ("inset-block", Position),
    ("inset-block-start", Position),
    ("inset-block-end", Position),
    ("z-index", Position),
    ("anchor-name", Position),
    ("anchor-scope", Position),
    ("position-anchor", Position),
    ("position-area", Position),
    ("position-try", Position),
    ("position-try-fallbacks", Position),
    ("position-try-order", Position),
    ("position-visibility", Position),
    // Typography
    ("font", Typography),
    ("font-family", Typography),
    ("font-size", Typography),
    ("font-style", Typography),
    ("font-weight", Typography),
    ("font-variant", Typography),
    ("font-variant-numeric", Typography),
    ("font-variant-caps", Typography),
    ("font-variant-ligatures", Typography),
    ("font-stretch", Typography),
    ("font-feature-settings", Typography),
    ("font-variation-settings", Typography),
    ("font-kerning", Typography),
    ("font-optical-sizing", Typography),
    ("font-size-adjust", Typography),
    ("font-synthesis", Typography),
    ("line-height", Typography),
    ("letter-spacing", Typography),
    ("word-spacing", Typography),
    ("text-align", Typography),
    ("text-align-last", Typography),
    ("text-indent", Typography),
    ("text-transform", Typography),
    ("text-decoration", Typography),
    ("text-decoration-line", Typography),
    ("text-decoration-style", Typography),
    ("text-decoration-color", Typography),
    ("text-decoration-thickness", Typography),
    ("text-underline-offset", Typography),
    ("text-underline-position", Typography),
    ("text-overflow", Typography),
    ("text-wrap", Typography),
    ("text-rendering", Typography),
    ("text-emphasis", Typography),
    ("white-space", Typography),
    ("white-space-collapse", Typography),
    ("word-break", Typography),
    ("overflow-wrap", Typography),
    ("hyphens", Typography),
    ("direction", Typography),
    ("unicode-bidi", Typography),
    ("writing-mode", Typography),
    ("text-orientation", Typography),
    ("vertical-align", Typography),
    ("list-style", Typography),
    ("list-style-type", Typography),
    ("list-style-position", Typography),
    ("list-style-image", Typography),
    ("quotes", Typography),
    ("content", Typography),
    ("counter-reset", Typography),
    ("counter-increment", Typography),
    ("counter-set", Typography),
    ("tab-size", Typography),
    ("line-clamp", Typography),
    ("-webkit-line-clamp", Typography),
    ("-webkit-box-orient", Typography),
    ("-webkit-font-smoothing", Typography),
    ("-moz-osx-font-smoothing", Typography),
    ("-webkit-text-stroke", Typography),
    ("-webkit-text-stroke-width", Typography),
    ("-webkit-text-stroke-color", Typography),
    // Color
    ("color", Color),
    ("background", Color),
    ("background-color", Color),
    ("background-image", Color),
    ("background-position", Color),
    ("background-position-x", Color),
    ("background-position-y", Color),
    ("background-size", Color),
    ("background-repeat", Color),
    ("background-attachment", Color),
    ("background-clip", Color),
    ("background-origin", Color),
    ("background-blend-mode", Color),
    ("accent-color", Color),
    ("caret-color", Color),
    ("color-scheme", Color),
    ("fill", Color),
    ("fill-opacity", Color),
    ("stroke", Color),
    ("stroke-width", Color),
    ("stroke-opacity", Color),
    ("stroke-dasharray", Color),
    ("stroke-dashoffset", Color),
    ("stroke-linecap", Color),
    ("stroke-linejoin", Color),
    ("stroke-miterlimit", Color),
    ("stop-color", Color),
    ("stop-opacity", Color),
    ("flood-color", Color),
    ("flood-opacity", Color),
    ("forced-color-adjust", Color),
    ("print-color-adjust", Color),
    ("-webkit-tap-highlight-color", Color),
    ("-webkit-text-fill-color", Color),
    // Border
    ("border", Border),
    ("border-width", Border),
    ("border-style", Border),
    ("border-color", Border),
    ("border-top", Border),
    ("border-right", Border),
    ("border-bottom", Border),
    ("border-left", Border),
    ("border-top-width", Border),
    ("border-right-width", Border),
    ("border-bottom-width", Border),
    ("border-left-width", Border),
    ("border-top-style", Border),
    ("border-right-style", Border),
    ("border-bottom-style", Border),
    ("border-left-style", Border),
    ("border-top-color", Border),
    ("border-right-color", Border),
    ("border-bottom-color", Border),
    ("border-left-color", Border),
    ("border-inline", Border),
    ("border-inline-start", Border),
    ("border-inline-end", Border),
    ("border-inline-width", Border),
    ("border-inline-style", Border),
    ("border-inline-color", Border),
    ("border-inline-start-width", Border),
    ("border-inline-start-style", Border),
    ("border-inline-start-color", Border),
    ("border-inline-end-width", Border),
    ("border-inline-end-style", Border),
    ("border-inline-end-color", Border),
    ("border-block", Border),
    ("border-block-start", Border),
    ("border-block-end", Border),
    ("border-block-width", Border),
    ("border-block-style", Border),
    ("border-block-color", Border),
    ("border-block-start-width", Border),
    ("border-block-start-style", Border),
    ("border-block-start-color", Border),
    ("border-block-end-width", Border),
    ("border-block-end-style", Border),
    ("border-block-end-color", Border),
    ("border-radius", Border),
    ("border-top-left-radius", Border),
    ("border-top-right-radius", Border),
    ("border-bottom-right-radius", Border),
    ("border-bottom-left-radius", Border),
    ("border-start-start-radius", Border),
    ("border-start-end-radius", Border),
    ("border-end-start-radius", Border),
    ("border-end-end-radius", Border),
    ("border-image", Border),
    ("border-image-source", Border),
    ("border-image-slice", Border),
    ("border-image-width", Border),
    ("border-image-outset", Border),
    ("border-image-repeat", Border),
    ("border-collapse", Border),
    ("border-spacing", Border),
    ("outline", Border),
    ("outline-width", Border),
    ("outline-style", Border),
    ("outline-color", Border),
    ("outline-offset", Border),
    // Effects
    ("opacity", Effects),
    ("box-shadow", Effects),
    ("text-shadow", Effects),
    ("filter", Effects),
    ("backdrop-filter", Effects),
    ("-webkit-backdrop-filter", Effects),
    ("mix-blend-mode", Effects),
    ("transform", Effects),
    ("transform-origin", Effects),
    ("transform-style", Effects),
    ("transform-box", Effects),
    ("translate", Effects),
    ("rotate", Effects),
    ("scale", Effects),
    ("perspective", Effects),
    ("perspective-origin", Effects),
    ("backface-visibility", Effects),
    ("clip", Effects),
    ("clip-path", Effects),
    ("mask", Effects),
    ("mask-image", Effects),
    ("mask-mode", Effects),
    ("mask-position", Effects),
    ("mask-size", Effects),
    ("mask-repeat", Effects),
    ("mask-origin", Effects),
    ("mask-clip", Effects),
    ("mask-composite", Effects),
    ("transition", Effects),
    ("transition-property", Effects),
    ("transition-duration", Effects),
    ("transition-timing-function", Effects),
    ("transition-delay", Effects),
    ("transition-behavior", Effects),
    ("animation", Effects),
    ("animation-name", Effects),
    ("animation-duration", Effects),
    ("animation-timing-function", Effects),
    ("animation-delay", Effects),
    ("animation-iteration-count", Effects),
    ("animation-direction", Effects),
    ("animation-fill-mode", Effects),
    ("animation-play-state", Effects),
    ("animation-composition", Effects),
    ("animation-timeline", Effects),
    ("view-transition-name", Effects),
    ("view-transition-class", Effects),
    ("will-change", Effects),
    ("image-rendering", Effects),
    // Interactivity
    ("cursor", Interactivity),
    ("pointer-events", Interactivity),
    ("user-select", Interactivity),
    ("touch-action", Interactivity),
    ("resize", Interactivity),
    ("appearance", Interactivity),
    ("scroll-behavior", Interactivity),
    ("scroll-snap-type", Interactivity),
    ("scroll-snap-align", Interactivity),
    ("scroll-snap-stop", Interactivity),
    ("overscroll-behavior", Interactivity),
    ("overscroll-behavior-x", Interactivity),
    ("overscroll-behavior-y", Interactivity),
    ("scrollbar-width", Interactivity),
    ("scrollbar-color", Interactivity),
    ("scrollbar-gutter", Interactivity),
    ("interpolate-size", Interactivity),
    ("-webkit-overflow-scrolling", Interactivity),
    // Misc
    ("all", Misc),
    ("zoom", Misc),
];

const SHORTHAND_TABLE: &[(&str, &[&str])] = &[
    ("margin", &["margin-top", "margin-right", "margin-bottom", "margin-left"]),
    ("margin-inline", &["margin-inline-start", "margin-inline-end"]),
    ("margin-block", &["margin-block-start", "margin-block-end"]),
    ("padding", &["padding-top", "padding-right", "padding-bottom", "padding-left"]),
    ("padding-inline", &["padding-inline-start", "padding-inline-end"]),
    ("padding-block", &["padding-block-start", "padding-block-end"]),
    (
        "scroll-margin",
        &["scroll-margin-top", "scroll-margin-right", "scroll-margin-bottom", "scroll-margin-left"],
    ),
    (
        "scroll-padding",
        &["scroll-padding-top", "scroll-padding-right", "scroll-padding-bottom", "scroll-padding-left"],
    ),
    ("inset", &["top", "right", "bottom", "left"]),
    ("inset-inline", &["inset-inline-start", "inset-inline-end"]),
    ("inset-block", &["inset-block-start", "inset-block-end"]),
    (
        "border",
        &["border-width", "border-style", "border-color", "border-top", "border-right", "border-bottom", "border-left"],
    ),
    (
        "border-width",
        &["border-top-width", "border-right-width", "border-bottom-width", "border-left-width"],
    ),
    (
        "border-style",
        &["border-top-style", "border-right-style", "border-bottom-style", "border-left-style"],
    ),
    (
        "border-color",
        &["border-top-color", "border-right-color", "border-bottom-color", "border-left-color"],
    ),
    ("border-top", &["border-top-width", "border-top-style", "border-top-color"]),
    ("border-right", &["border-right-width", "border-right-style", "border-right-color"]),
    ("border-bottom", &["border-bottom-width", "border-bottom-style", "border-bottom-color"]),
    ("border-left", &["border-left-width", "border-left-style", "border-left-color"]),
    ("border-inline", &["border-inline-start", "border-inline-end"]),
    (
        "border-inline-start",
        &["border-inline-start-width", "border-inline-start-style", "border-inline-start-color"],
    ),
    (
        "border-inline-end",
        &["border-inline-end-width", "border-inline-end-style", "border-inline-end-color"],
    ),
    ("border-block", &["border-block-start", "border-block-end"]),
    (
        "border-block-start",
        &["border-block-start-width", "border-block-start-style", "border-block-start-color"],
    ),
    (
        "border-block-end",
        &["border-block-end-width", "border-block-end-style", "border-block-end-color"],
    ),
    (
        "border-radius",
        &[
            "border-top-left-radius",
            "border-top-right-radius",
            "border-bottom-right-radius",
            "border-bottom-left-radius",
        ],
    ),
    (
        "border-image",
        &[
            "border-image-source",
            "border-image-slice",
            "border-image-width",
            "border-image-outset",
            "border-image-repeat",
        ],
    ),
    ("outline", &["outline-width", "outline-style", "outline-color"]),
    (
        "background",
        &[
            "background-color",
            "background-image",
            "background-position",
            "background-size",
            "background-repeat",
            "background-attachment",
            "background-clip",
            "background-origin",
        ],
    ),
    ("background-position", &["background-position-x", "background-position-y"]),
    (
        "font",
        &[
            "font-style",
            "font-variant",
            "font-weight",
            "font-stretch",
            "font-size",
            "line-height",
            "font-family",
        ],
    ),
    ("flex", &["flex-grow", "flex-shrink", "flex-basis"]),
    ("flex-flow", &["flex-direction", "flex-wrap"]),
    ("gap", &["row-gap", "column-gap"]),
    ("place-content", &["align-content", "justify-content"]),
    ("place-items", &["align-items", "justify-items"]),
    ("place-self", &["align-self", "justify-self"]),
    ("overflow", &["overflow-x", "overflow-y"]),
    ("overscroll-behavior", &["overscroll-behavior-x", "overscroll-behavior-y"]),
    (
        "grid",
        &[
            "grid-template",
            "grid-template-rows",
            "grid-template-columns",
            "grid-template-areas",
            "grid-auto-rows",
            "grid-auto-columns",
            "grid-auto-flow",
        ],
    ),
    ("grid-template", &["grid-template-rows", "grid-template-columns", "grid-template-areas"]),
    (
        "grid-area",
        &["grid-row-start", "grid-column-start", "grid-row-end", "grid-column-end"],
    ),
    ("grid-row", &["grid-row-start", "grid-row-end"]),
    ("grid-column", &["grid-column-start", "grid-column-end"]),
    ("list-style", &["list-style-type", "list-style-position", "list-style-image"]),
    (
        "text-decoration",
        &[
            "text-decoration-line",
            "text-decoration-style",
            "text-decoration-color",
            "text-decoration-thickness",
        ],
    ),
    (
        "transition",
        &[
            "transition-property",
            "transition-duration",
            "transition-timing-function",
            "transition-delay",
            "transition-behavior",
        ],
    ),
    (
        "animation",
        &[
            "animation-name",
            "animation-duration",
            "animation-timing-function",
            "animation-delay",
            "animation-iteration-count",
            "animation-direction",
            "animation-fill-mode",
            "animation-play-state",
        ],
    ),
    ("columns", &["column-width", "column-count"]),
    ("column-rule", &["column-rule-width", "column-rule-style", "column-rule-color"]),
    (
        "mask",
        &["mask-image", "mask-mode", "mask-position", "mask-size", "mask-repeat", "mask-origin", "mask-clip"],
    ),
    ("container", &["container-name", "container-type"]),
    (
        "-webkit-text-stroke",
        &["-webkit-text-stroke-width", "-webkit-text-stroke-color"],
    ),
];

/// Properties whose numeric values stay unitless
const UNITLESS_PROPERTIES: &[&str] = &[
    "animation-iteration-count",
    "aspect-ratio",
    "border-image-outset",
    "border-image-slice",
    "border-image-width",
    "column-count",
    "fill-opacity",
    "flex",
    "flex-grow",
    "flex-shrink",
    "flood-opacity",
    "font-size-adjust",
    "font-weight",
    "grid-area",
    "grid-column",
    "grid-column-end",
    "grid-column-start",
    "grid-row",
    "grid-row-end",
    "grid-row-start",
    "line-clamp",
    "-webkit-line-clamp",
    "line-height",
    "opacity",
    "order",
    "orphans",
    "scale",
    "stop-opacity",
    "stroke-miterlimit",
    "stroke-opacity",
    "tab-size",
    "widows",
    "z-index",
    "zoom",
];

/// Properties whose numeric values are lengths and get `px`
const LENGTH_PROPERTIES: &[&str] = &[
    "width",
    "height",
    "min-width",
    "min-height",
    "max-width",
    "max-height",
    "inline-size",
    "block-size",
    "min-inline-size",
    "max-inline-size",
    "min-block-size",
    "max-block-size",
    "margin",
    "margin-top",
    "margin-right",
    "margin-bottom",
    "margin-left",
    "margin-inline",
    "margin-inline-start",
    "margin-inline-end",
    "margin-block",
    "margin-block-start",
    "margin-block-end",
    "padding",
    "padding-top",
    "padding-right",
    "padding-bottom",
    "padding-left",
    "padding-inline",
    "padding-inline-start",
    "padding-inline-end",
    "padding-block",
    "padding-block-start",
    "padding-block-end",
    "scroll-margin",
    "scroll-margin-top",
    "scroll-margin-right",
    "scroll-margin-bottom",
    "scroll-margin-left",
    "scroll-padding",
    "scroll-padding-top",
    "scroll-padding-right",
    "scroll-padding-bottom",
    "scroll-padding-left",
    "top",
    "right",
    "bottom",
    "left",
    "inset",
    "inset-inline",
    "inset-inline-start",
    "inset-inline-end",
    "inset-block",
    "inset-block-start",
    "inset-block-end",
    "gap",
    "row-gap",
    "column-gap",
    "column-width",
    "column-rule-width",
    "flex-basis",
    "font-size",
    "letter-spacing",
    "word-spacing",
    "text-indent",
    "text-underline-offset",
    "text-decoration-thickness",
    "border-width",
    "border-top-width",
    "border-right-width",
    "border-bottom-width",
    "border-left-width",
    "border-inline-width",
    "border-inline-start-width",
    "border-inline-end-width",
    "border-block-width",
    "border-block-start-width",
    "border-block-end-width",
    "border-radius",
    "border-top-left-radius",
    "border-top-right-radius",
    "border-bottom-right-radius",
    "border-bottom-left-radius",
    "border-start-start-radius",
    "border-start-end-radius",
    "border-end-start-radius",
    "border-end-end-radius",
    "border-spacing",
    "outline-width",
    "outline-offset",
    "perspective",
    "stroke-width",
    "-webkit-text-stroke-width",
];

/// Properties whose numeric values are times in milliseconds
const TIME_PROPERTIES: &[&str] = &[
    "transition-duration",
    "transition-delay",
    "animation-duration",
    "animation-delay",
];

static PROPERTY_GROUPS: LazyLock<FxHashMap<&'static str, PropertyGroup>> =
    LazyLock::new(|| PROPERTY_TABLE.iter().copied().collect());

static SHORTHANDS: LazyLock<FxHashMap<&'static str, &'static [&'static str]>> =
    LazyLock::new(|| SHORTHAND_TABLE.iter().copied().collect());

static UNITLESS: LazyLock<FxHashSet<&'static str>> =
    LazyLock::new(|| UNITLESS_PROPERTIES.iter().copied().collect());

static LENGTHS: LazyLock<FxHashSet<&'static str>> =
    LazyLock::new(|| LENGTH_PROPERTIES.iter().copied().collect());

/// Check if a property name is a custom property (`--*`)
pub fn is_custom_property(name: &str) -> bool {
    name.starts_with("--")
}

/// Check if a dash-cased property name is a known CSS property
pub fn is_known_property(name: &str) -> bool {
    PROPERTY_GROUPS.contains_key(name)
}

/// All known property names, in table order
pub fn known_properties() -> impl Iterator<Item = &'static str> {
    PROPERTY_TABLE.iter().map(|(name, _)| *name)
}

/// Priority group of a property. Custom and unknown properties fall into `Misc`.
pub fn property_group(name: &str) -> PropertyGroup {
    PROPERTY_GROUPS.get(name).copied().unwrap_or(Misc)
}

/// Longhands directly set by a shorthand
pub fn longhands(name: &str) -> Option<&'static [&'static str]> {
    SHORTHANDS.get(name).copied()
}

/// Whether `name` is a shorthand
pub fn is_shorthand(name: &str) -> bool {
    SHORTHANDS.contains_key(name)
}

/// Every property transitively set by a shorthand
pub fn all_longhands(name: &str) -> Vec<&'static str> {
    let mut out = Vec::new();
    let mut stack: Vec<&'static str> = longhands(name).map(|l| l.to_vec()).unwrap_or_default();
    while let Some(next) = stack.pop() {
        if out.contains(&next) {
            continue;
        }
        out.push(next);
        if let Some(nested) = longhands(next) {
            stack.extend_from_slice(nested);
        }
    }
    out
}

/// Tier of a property in the shorthand hierarchy
pub fn property_tier(name: &str) -> PropertyTier {
    match longhands(name) {
        None => PropertyTier::Longhand,
        Some(parts) if parts.iter().any(|p| is_shorthand(p)) => PropertyTier::ShorthandOfShorthands,
        Some(_) => PropertyTier::Shorthand,
    }
}

pub fn is_unitless(name: &str) -> bool {
    UNITLESS.contains(name)
}

pub fn is_length_property(name: &str) -> bool {
    LENGTHS.contains(name)
}

pub fn is_time_property(name: &str) -> bool {
    TIME_PROPERTIES.contains(&name)
}

/// Strip a vendor prefix (`-webkit-`, `-moz-`, `-ms-`, `-o-`)
pub fn unprefixed(name: &str) -> Option<&str> {
    ["-webkit-", "-moz-", "-ms-", "-o-"]
        .iter()
        .find_map(|prefix| name.strip_prefix(prefix))
}

/// Convert `backgroundColor` or `background_color` to `background-color`.
/// Custom properties are returned unchanged.
pub fn dash_case(name: &str) -> String {
    if is_custom_property(name) {
        return name.to_string();
    }

    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if c == '_' {
            out.push('-');
        } else if c.is_ascii_uppercase() {
            if i > 0 {
                out.push('-');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }

    // WebkitLineClamp -> -webkit-line-clamp
    if ["webkit-", "moz-", "ms-"].iter().any(|p| out.starts_with(p))
        && name.starts_with(|c: char| c.is_ascii_uppercase())
    {
        out.insert(0, '-');
    }
    out
}
