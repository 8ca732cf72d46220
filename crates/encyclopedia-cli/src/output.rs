//! Output formatting for item cards, search results and settings.
//!
//! Every renderer writes to a caller-supplied writer so the binary can
//! target stdout and tests can target a buffer.

use std::io::{self, Write};
use std::path::Path;

use clap::ValueEnum;
use serde::Serialize;

use encyclopedia_lib::card::{CardField, IndustrySection, ItemLink, Resistances};
use encyclopedia_lib::modifiers::ModifierEffect;
use encyclopedia_lib::{ItemCard, SearchHit, Settings};

use crate::terminal::{format_with_separators, ColorPalette};

/// Width of the label column in text output.
const LABEL_WIDTH: usize = 26;

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Write any serializable value as pretty JSON followed by a newline.
pub fn write_json<W: Write, T: Serialize + ?Sized>(mut out: W, value: &T) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut out, value).map_err(io::Error::other)?;
    out.write_all(b"\n")
}

fn link(link: &ItemLink, p: &ColorPalette) -> String {
    format!("{}{}{} (#{})", p.link, link.name, p.reset, link.id)
}

fn section<W: Write>(out: &mut W, title: &str, p: &ColorPalette) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}{}{}", p.heading, title, p.reset)
}

fn row<W: Write>(out: &mut W, label: &str, value: &str, p: &ColorPalette) -> io::Result<()> {
    writeln!(
        out,
        "  {}{:<width$}{} {}",
        p.label,
        label,
        p.reset,
        value,
        width = LABEL_WIDTH
    )
}

fn fields<W: Write>(out: &mut W, fields: &[CardField], p: &ColorPalette) -> io::Result<()> {
    for field in fields {
        let value = match &field.unit {
            Some(unit) => format!("{} {}", field.value, unit),
            None => field.value.clone(),
        };
        row(out, &field.label, &value, p)?;
    }
    Ok(())
}

fn effect(effect: &ModifierEffect, p: &ColorPalette) -> String {
    let unit = effect
        .unit
        .as_deref()
        .map(|unit| format!(" {unit}"))
        .unwrap_or_default();
    format!(
        "{} {}{}{}{}",
        effect.full_label(),
        p.signed(effect.value),
        effect.display_value(),
        unit,
        p.reset
    )
}

fn percent(value: Option<f64>) -> String {
    value
        .map(|v| format!("{v:.1}%"))
        .unwrap_or_else(|| "--".to_string())
}

fn resistances<W: Write>(
    out: &mut W,
    layer: &str,
    resists: &Resistances,
    p: &ColorPalette,
) -> io::Result<()> {
    let value = format!(
        "EM {}  TH {}  KI {}  EX {}",
        percent(resists.em),
        percent(resists.thermal),
        percent(resists.kinetic),
        percent(resists.explosive)
    );
    row(out, layer, &value, p)
}

/// Render an item card as text.
pub fn render_card<W: Write>(mut out: W, card: &ItemCard, p: &ColorPalette) -> io::Result<()> {
    let out = &mut out;
    writeln!(out, "{}{}{} (#{})", p.heading, card.name, p.reset, card.id)?;
    if let Some(group) = &card.group {
        writeln!(out, "{}{}{}", p.label, group, p.reset)?;
    }
    if let Some(description) = &card.description {
        writeln!(out)?;
        writeln!(out, "{description}")?;
    }

    if !card.basic.is_empty() {
        section(out, "Basic", p)?;
        fields(out, &card.basic, p)?;
    }
    if let Some(blueprint) = &card.built_by {
        row(out, "Built by", &link(blueprint, p), p)?;
    }

    if let Some(skill) = &card.skill {
        section(out, "Skill", p)?;
        if let Some(tech) = skill.tech_level {
            row(out, "Tech level", &tech.to_string(), p)?;
        }
        if let Some(level) = skill.starting_level {
            row(out, "Starting level", &level.to_string(), p)?;
        }
        for req in &skill.prerequisites {
            row(
                out,
                "Requires",
                &format!("{} level {}", link(&req.skill, p), req.level),
                p,
            )?;
        }
        writeln!(
            out,
            "  {}Training at {} SP/min{}",
            p.label, skill.training_rate, p.reset
        )?;
        for cost in &skill.training {
            writeln!(
                out,
                "    Level {}  {:>9} SP  {}",
                cost.level,
                format_with_separators(cost.skill_points),
                cost.duration
            )?;
        }
        for level in skill.effects.iter().filter(|level| !level.effects.is_empty()) {
            for item in &level.effects {
                writeln!(out, "    Level {}: {}", level.level, effect(item, p))?;
            }
        }
    }

    if let Some(industry) = &card.industry {
        section(out, "Manufacturing", p)?;
        match industry {
            IndustrySection::Available {
                output,
                quantity,
                time,
                money,
                materials,
            } => {
                row(out, "Produces", &format!("{} x {}", link(output, p), quantity), p)?;
                row(out, "Build time", &time.to_string(), p)?;
                row(out, "Cost", &format!("{} ISK", format_with_separators(*money)), p)?;
                for line in materials {
                    row(
                        out,
                        &line.material.name,
                        &format_with_separators(line.quantity),
                        p,
                    )?;
                }
            }
            IndustrySection::Incomplete => {
                writeln!(
                    out,
                    "  {}Manufacturing data for this blueprint is incomplete.{}",
                    p.notice, p.reset
                )?;
            }
        }
    }

    if let Some(ship) = &card.ship {
        section(out, "Slots", p)?;
        fields(out, &ship.slots, p)?;
        if !ship.bonuses.is_empty() {
            section(out, "Bonuses", p)?;
            for bonus in &ship.bonuses {
                let heading = match &bonus.skill_name {
                    Some(name) => format!("{name} bonus per level"),
                    None => "Role bonus".to_string(),
                };
                writeln!(out, "  {}{}{}", p.label, heading, p.reset)?;
                for item in &bonus.effects {
                    writeln!(out, "    {}", effect(item, p))?;
                }
            }
        }
        section(out, "Ship", p)?;
        fields(out, &ship.stats, p)?;
        resistances(out, "Shield resists", &ship.shield, p)?;
        resistances(out, "Armor resists", &ship.armor, p)?;
        resistances(out, "Structure resists", &ship.structure, p)?;
    }

    if let Some(weapon) = &card.weapon {
        section(out, "Weapon", p)?;
        fields(out, &weapon.damage, p)?;
        fields(out, &weapon.stats, p)?;
    }
    Ok(())
}

/// Render search results as text, one hit per line.
pub fn render_search<W: Write>(mut out: W, hits: &[SearchHit], p: &ColorPalette) -> io::Result<()> {
    if hits.is_empty() {
        return writeln!(out, "No matching items.");
    }
    for hit in hits {
        match &hit.group {
            Some(group) => writeln!(
                out,
                "{:>8}  {}  {}{}{}",
                hit.id.get(),
                hit.name,
                p.label,
                group,
                p.reset
            )?,
            None => writeln!(out, "{:>8}  {}", hit.id.get(), hit.name)?,
        }
    }
    Ok(())
}

/// Render settings as text.
pub fn render_settings<W: Write>(
    mut out: W,
    settings: &Settings,
    path: &Path,
    p: &ColorPalette,
) -> io::Result<()> {
    let out = &mut out;
    row(out, "Language", &settings.language, p)?;
    row(out, "Training rate", &format!("{} SP/min", settings.training_rate), p)?;
    row(out, "Settings file", &path.display().to_string(), p)
}

#[cfg(test)]
mod tests {
    use encyclopedia_lib::classify::Classification;
    use encyclopedia_lib::ItemId;

    use super::*;

    fn render(card: &ItemCard) -> String {
        let mut buf = Vec::new();
        render_card(&mut buf, card, &ColorPalette::plain()).expect("render");
        String::from_utf8(buf).expect("utf8")
    }

    fn bare_card() -> ItemCard {
        ItemCard {
            id: ItemId(1201),
            name: "Prototype Blueprint".to_string(),
            group: Some("Blueprint".to_string()),
            description: None,
            classification: Classification {
                blueprint: true,
                ..Classification::default()
            },
            basic: Vec::new(),
            built_by: None,
            skill: None,
            industry: Some(IndustrySection::Incomplete),
            ship: None,
            weapon: None,
        }
    }

    #[test]
    fn incomplete_blueprint_renders_notice() {
        let text = render(&bare_card());
        assert!(text.starts_with("Prototype Blueprint (#1201)\nBlueprint\n"));
        assert!(text.contains("Manufacturing data for this blueprint is incomplete."));
    }

    #[test]
    fn fields_include_units() {
        let mut card = bare_card();
        card.basic.push(CardField {
            key: "volume".to_string(),
            label: "Volume".to_string(),
            value: "0.01".to_string(),
            unit: Some("m3".to_string()),
        });
        let text = render(&card);
        assert!(text.contains("\nBasic\n"));
        assert!(text.contains("Volume"));
        assert!(text.contains("0.01 m3"));
    }

    #[test]
    fn empty_search_says_so() {
        let mut buf = Vec::new();
        render_search(&mut buf, &[], &ColorPalette::plain()).expect("render");
        assert_eq!(String::from_utf8(buf).expect("utf8"), "No matching items.\n");
    }

    #[test]
    fn json_output_ends_with_newline() {
        let mut buf = Vec::new();
        write_json(&mut buf, &bare_card()).expect("json");
        let text = String::from_utf8(buf).expect("utf8");
        assert!(text.ends_with("}\n"));
        assert!(text.contains("\"status\": \"incomplete\""));
    }
}
