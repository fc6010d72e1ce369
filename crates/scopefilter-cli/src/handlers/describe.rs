use crate::context::CliContext;
use crate::output;
use serde::Serialize;

#[derive(Serialize)]
struct FilterSummary<'a> {
    attribute: &'a str,
    column: &'a str,
    #[serde(rename = "match")]
    kind: String,
}

/// List filters in the order they apply. A redefined attribute shows its last
/// definition, matching what the registry holds.
pub fn handle(ctx: &CliContext) -> anyhow::Result<()> {
    let definitions = &ctx.config.filters;
    let summaries: Vec<FilterSummary<'_>> = ctx
        .registry
        .attributes()
        .filter_map(|attribute| definitions.iter().rev().find(|d| d.attribute == attribute))
        .map(|def| FilterSummary {
            attribute: &def.attribute,
            column: def.effective_column(),
            kind: def.kind.to_string(),
        })
        .collect();

    output::output_list(summaries)
}
