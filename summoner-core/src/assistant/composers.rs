//! Reply formatting
//!
//! Composers only read the enriched record (or a matchup table) they are
//! given. A composer returning `None` lets the router fall through to the
//! next source.

use std::fmt::Write as _;

use crate::catalog::{AbilityKey, AbilitySlot, ReferenceRecord};
use crate::conversation::Role;
use crate::enrich::{AbilityRatios, EnrichedRecord};
use crate::matchup::{MatchupEntry, MatchupTable};

pub const REPHRASE: &str =
    "Je suis désolé, votre question est trop courte. Pourriez-vous la reformuler ?";

pub const CLARIFY: &str = "Je ne suis pas sûr de comprendre votre question. Essayez de la reformuler en précisant le champion et le type d'information que vous recherchez (statistiques, capacités, counters, etc.).";

pub const APOLOGY: &str =
    "Désolé, le service de réponse est momentanément indisponible. Réessayez dans quelques instants.";

pub const CANCELLED: &str = "La requête a été annulée.";

const LORE_PREVIEW_CHARS: usize = 200;

/// Canned reply for a greeting word.
pub fn greeting(word: &str) -> &'static str {
    match word {
        "bonjour" => "Bonjour invocateur ! Je suis là pour vous aider à progresser dans League of Legends. Je peux vous conseiller sur :\n- Les champions et leurs capacités\n- Les builds et objets\n- Les stratégies de jeu\n- Les mécaniques de base\n\nQue voulez-vous apprendre ?",
        "hey" => "Hey invocateur ! Prêt à devenir plus fort sur League of Legends ? Je peux vous aider avec :\n- L'analyse des champions\n- Les conseils de gameplay\n- Les builds optimaux\n- Les stratégies avancées\n\nSur quoi puis-je vous conseiller ?",
        "hello" => "Bonjour invocateur ! En tant qu'assistant LoL, je peux vous aider à :\n- Maîtriser les champions\n- Comprendre les mécaniques\n- Optimiser vos builds\n- Améliorer votre gameplay\n\nQue souhaitez-vous explorer ?",
        "hi" => "Salut invocateur ! Je suis votre coach LoL personnel. Je peux vous aider avec :\n- L'apprentissage des champions\n- Les stratégies de jeu\n- Les builds recommandés\n- Les conseils pro\n\nQue voulez-vous savoir ?",
        _ => "Salut invocateur ! Je suis votre assistant League of Legends. Je peux vous aider avec :\n- Des informations sur les champions\n- Des conseils de gameplay\n- Des stratégies de jeu\n- Des explications sur les rôles\n\nQue souhaitez-vous savoir ?",
    }
}

/// Format a number without trailing zeros, at most two decimals.
pub fn fmt_num(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 {
        format!("{}", rounded as i64)
    } else {
        let text = format!("{:.2}", rounded);
        text.trim_end_matches('0').to_string()
    }
}

fn fmt_list(values: &[f64]) -> String {
    values.iter().map(|v| fmt_num(*v)).collect::<Vec<_>>().join(", ")
}

fn truncate_chars(text: &str, max: usize) -> (&str, bool) {
    match text.char_indices().nth(max) {
        Some((idx, _)) => (&text[..idx], true),
        None => (text, false),
    }
}

/// Base stats, level checkpoints, damage profile and scores.
pub fn stats(enriched: &EnrichedRecord) -> Option<String> {
    let record = &enriched.record;
    let base = &record.stats;
    let level_one = enriched.level(1)?;
    let mut out = String::new();

    let _ = write!(
        out,
        "Statistiques complètes de {} :\n\nStatistiques de base (niveau 1) :\n",
        record.name
    );
    let _ = writeln!(out, "- PV : {} (+{} par niveau)", fmt_num(base.hp), fmt_num(base.hp_per_level));
    if record.uses_mana() {
        let _ = writeln!(out, "- Mana : {} (+{} par niveau)", fmt_num(base.mp), fmt_num(base.mp_per_level));
    }
    let _ = writeln!(out, "- Armure : {} (+{} par niveau)", fmt_num(base.armor), fmt_num(base.armor_per_level));
    let _ = writeln!(
        out,
        "- Résistance magique : {} (+{} par niveau)",
        fmt_num(base.magic_resist),
        fmt_num(base.magic_resist_per_level)
    );
    let _ = writeln!(
        out,
        "- Dégâts d'attaque : {} (+{} par niveau)",
        fmt_num(base.attack_damage),
        fmt_num(base.attack_damage_per_level)
    );
    let _ = writeln!(
        out,
        "- Vitesse d'attaque : {} (+{}% par niveau)",
        fmt_num(level_one.attack_speed),
        fmt_num(base.attack_speed_per_level)
    );
    let _ = writeln!(out, "- Vitesse de déplacement : {}", fmt_num(base.move_speed));

    out.push_str("\nStatistiques aux niveaux clés :\n");
    for snapshot in enriched.levels.iter().filter(|s| s.level > 1) {
        let _ = writeln!(out, "\nNiveau {} :", snapshot.level);
        let _ = writeln!(out, "- PV : {}", fmt_num(snapshot.hp));
        if record.uses_mana() {
            let _ = writeln!(out, "- Mana : {}", fmt_num(snapshot.mp));
        }
        let _ = writeln!(out, "- Armure : {}", fmt_num(snapshot.armor));
        let _ = writeln!(out, "- Résistance magique : {}", fmt_num(snapshot.magic_resist));
        let _ = writeln!(out, "- Dégâts d'attaque : {}", fmt_num(snapshot.attack_damage.round()));
        let _ = writeln!(out, "- DPS théorique : {}", fmt_num(snapshot.dps));
    }

    let _ = write!(
        out,
        "\nProfil de dégâts :\n- Dégâts physiques : {}/100\n- Dégâts magiques : {}/100\n",
        fmt_num(enriched.damage.physical),
        fmt_num(enriched.damage.magical)
    );
    let _ = write!(
        out,
        "\nScores d'évaluation :\n- Mobilité : {}/10\n- Scaling : {}/10",
        enriched.mobility,
        fmt_num(enriched.scaling)
    );

    Some(out)
}

fn ratio_lines(ratios: AbilityRatios) -> String {
    let mut out = String::new();
    if ratios.is_zero() {
        return out;
    }
    out.push_str("\nRatios :\n");
    if ratios.ap > 0.0 {
        let _ = writeln!(out, "- {}% AP", fmt_num(ratios.ap * 100.0));
    }
    if ratios.ad > 0.0 {
        let _ = writeln!(out, "- {}% AD", fmt_num(ratios.ad * 100.0));
    }
    out
}

/// One ability in detail; `None` when no slot was named.
pub fn ability(enriched: &EnrichedRecord, slot: Option<AbilitySlot>) -> Option<String> {
    let record = &enriched.record;
    let slot = slot?;

    let (name, description) = record.slot_text(slot);
    if name.is_empty() && description.is_empty() {
        return None;
    }

    let mut out = String::new();
    match slot {
        AbilitySlot::Passive => {
            let _ = write!(out, "Passif de {} - {}:\n{}\n", record.name, name, description);
        }
        AbilitySlot::Active(key) => {
            let ability = record.ability(key);
            let _ = write!(
                out,
                "Capacité {} de {} - {}:\n{}\n\nInformations techniques :\n",
                key, record.name, name, description
            );
            if !ability.cooldowns.is_empty() {
                let _ = writeln!(out, "- Cooldown par niveau : {} secondes", fmt_list(&ability.cooldowns));
            }
            if ability.costs.first().is_some_and(|c| *c > 0.0) {
                let _ = writeln!(
                    out,
                    "- Coût par niveau : {} {}",
                    fmt_list(&ability.costs),
                    ability.cost_type
                );
            }
            if ability.ranges.first().is_some_and(|r| *r > 0.0) {
                let _ = writeln!(out, "- Portée par niveau : {} unités", fmt_list(&ability.ranges));
            }
        }
    }
    out.push_str(&ratio_lines(enriched.slot_ratios(slot)));

    Some(out.trim_end().to_string())
}

fn kit_lines(out: &mut String, record: &ReferenceRecord) {
    out.push_str("\nCapacités :\n");
    let _ = writeln!(out, "- Passif : {}", record.passive.name);
    for key in AbilityKey::ALL {
        let _ = writeln!(out, "- {} : {}", key, record.ability(key).name);
    }
}

fn matchup_lines(out: &mut String, title: &str, entries: &[MatchupEntry]) {
    let _ = writeln!(out, "\n{} :", title);
    for entry in entries.iter().take(3) {
        let _ = writeln!(
            out,
            "- {} ({}% de victoires) : {}",
            entry.name,
            fmt_num(entry.rate as f64),
            entry.rationale
        );
    }
}

/// Counters, favorable matchups and synergies.
pub fn matchups(name: &str, table: &MatchupTable) -> Option<String> {
    if table.counter_picks.is_empty() && table.good_against.is_empty() && table.synergies.is_empty() {
        return None;
    }

    let mut out = format!("Analyse des matchups pour {} en {} :\n", name, table.role);
    if !table.counter_picks.is_empty() {
        matchup_lines(&mut out, "Contre-picks difficiles", &table.counter_picks);
    }
    if !table.good_against.is_empty() {
        matchup_lines(&mut out, "Matchups favorables", &table.good_against);
    }
    if !table.synergies.is_empty() {
        matchup_lines(&mut out, "Meilleures synergies", &table.synergies);
    }

    Some(out.trim_end().to_string())
}

/// Reply when no table exists for the champion in the role.
pub fn matchups_missing(name: &str) -> String {
    format!(
        "Je n'ai pas trouvé d'informations sur les matchups de {}. Essayez de préciser un rôle (top, jungle, mid, bot, support).",
        name
    )
}

/// Title, lore preview, derived figures, strengths and tips.
pub fn champion_info(enriched: &EnrichedRecord) -> Option<String> {
    let record = &enriched.record;
    let level_max = enriched.level(18)?;

    let lore = if record.lore.is_empty() { &record.blurb } else { &record.lore };
    let (preview, truncated) = truncate_chars(lore, LORE_PREVIEW_CHARS);

    let mut out = format!("{} est {}.\n", record.name, record.title);
    if !preview.is_empty() {
        let _ = write!(out, "\nHistoire : {}{}\n", preview, if truncated { "..." } else { "" });
    }

    let _ = write!(
        out,
        "\nStatistiques avancées :\n- DPS théorique : {}\n- Survie : {} PV au niveau 18\n- Mobilité : {}/10\n- Scaling : {}/10\n- Difficulté : {}/10\n",
        fmt_num(level_max.dps),
        fmt_num(level_max.hp),
        enriched.mobility,
        fmt_num(enriched.scaling),
        record.info.difficulty
    );

    kit_lines(&mut out, record);

    if !enriched.playstyle.is_empty() {
        out.push_str("\nPoints forts :\n");
        for tag in &enriched.playstyle {
            let _ = writeln!(out, "- {}", tag);
        }
    }

    if !record.ally_tips.is_empty() {
        out.push_str("\nConseils pour jouer ce champion :\n");
        for tip in record.ally_tips.iter().take(2) {
            let _ = writeln!(out, "- {}", tip);
        }
    }

    Some(out.trim_end().to_string())
}

/// Mana management, or a note that the champion does not use mana.
pub fn mana(record: &ReferenceRecord) -> String {
    if !record.uses_mana() {
        return format!("{} n'utilise pas de mana comme ressource.", record.name);
    }
    format!(
        "Conseils de gestion de mana pour {} :\n1. Gérez votre mana en early game\n2. Mana de base : {} (+{} par niveau)\n3. Régénération de mana : {}\n4. Privilégiez les objets avec mana et régénération",
        record.name,
        fmt_num(record.stats.mp),
        fmt_num(record.stats.mp_per_level),
        fmt_num(record.stats.mp_regen)
    )
}

/// Trading advice from the client ratings.
pub fn trade(record: &ReferenceRecord) -> String {
    let mut out = format!("Conseils de trade pour {} :\n1. Utilisez vos points forts :\n", record.name);
    let info = record.info;
    let mut strengths = 0;
    if info.attack > 7 {
        out.push_str("- Fort en auto-attaques\n");
        strengths += 1;
    }
    if info.magic > 7 {
        out.push_str("- Fort en dégâts magiques\n");
        strengths += 1;
    }
    if info.defense > 7 {
        out.push_str("- Bonne survie en trade\n");
        strengths += 1;
    }
    if strengths == 0 {
        out.push_str("- Échangez quand vos sorts sont disponibles et ceux de l'adversaire non\n");
    }
    let _ = write!(
        out,
        "\n2. Distance d'attaque : {} unités",
        fmt_num(record.stats.attack_range)
    );
    out
}

/// Teamfight positioning by class.
pub fn position(record: &ReferenceRecord) -> String {
    let (first, second) = if record.has_tag("Marksman") {
        ("Restez derrière votre équipe", "Maintenez votre distance de sécurité")
    } else if record.has_tag("Tank") {
        ("Positionnez-vous devant votre équipe", "Protégez vos carries")
    } else if record.has_tag("Assassin") {
        ("Cherchez des angles de flank", "Attendez les moments clés")
    } else {
        ("Adaptez votre position selon la situation", "Restez à portée de vos alliés")
    };
    format!(
        "Conseils de positionnement pour {} :\n1. {}\n2. {}",
        record.name, first, second
    )
}

/// Active abilities ordered by first-rank cooldown.
pub fn combo(record: &ReferenceRecord) -> Option<String> {
    let mut keys: Vec<(AbilityKey, f64)> = AbilityKey::ALL
        .iter()
        .filter_map(|key| {
            let cooldown = *record.ability(*key).cooldowns.first()?;
            cooldown.is_finite().then_some((*key, cooldown))
        })
        .collect();
    if keys.is_empty() {
        return None;
    }
    keys.sort_by(|a, b| a.1.total_cmp(&b.1));

    let mut out = format!(
        "Enchaînement de base pour {} (sorts du plus court au plus long temps de recharge) :\n",
        record.name
    );
    for (i, (key, cooldown)) in keys.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}. {} - {} ({} s)",
            i + 1,
            key,
            record.ability(*key).name,
            fmt_num(*cooldown)
        );
    }
    if let Some(tip) = record.ally_tips.first() {
        let _ = write!(out, "\nAstuce : {}", tip);
    }

    Some(out.trim_end().to_string())
}

/// Objective advice for the role the champion is played in.
pub fn objective(record: &ReferenceRecord, role: Option<Role>) -> String {
    let advice = match role {
        Some(Role::Top) => {
            "1. Poussez votre vague avant d'utiliser la Téléportation vers le dragon\n2. Le Héraut de la Faille est votre objectif prioritaire pour ouvrir les tours"
        }
        Some(Role::Jungle) => {
            "1. Suivez les temps de réapparition des dragons et du Baron\n2. Gardez Châtiment pour sécuriser l'objectif"
        }
        Some(Role::Mid) => {
            "1. Poussez votre vague avant chaque objectif pour arriver le premier dans la rivière\n2. Suivez votre jungler quand il se dirige vers un objectif"
        }
        Some(Role::Bot) => {
            "1. Gagnez la priorité de lane avant l'apparition du dragon\n2. Restez en vie : vos dégâts décident des combats autour du Baron"
        }
        Some(Role::Support) => {
            "1. Posez la vision autour de l'objectif une minute avant son apparition\n2. Nettoyez les balises adverses avec une balise de contrôle"
        }
        None => {
            "1. Prenez les objectifs après un combat gagné ou quand l'adversaire est absent\n2. Préparez la vision avant d'engager"
        }
    };

    match role {
        Some(role) => format!("Conseils d'objectifs pour {} en {} :\n{}", record.name, role, advice),
        None => format!("Conseils d'objectifs pour {} :\n{}", record.name, advice),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::record::fixtures;
    use crate::enrich::{HeuristicWeights, enrich};
    use crate::matchup::StaticMatchupTable;
    use crate::matchup::MatchupSource;
    use std::sync::Arc;

    fn enriched(record: ReferenceRecord) -> EnrichedRecord {
        enrich(Arc::new(record), &HeuristicWeights::default()).unwrap()
    }

    #[test]
    fn test_fmt_num() {
        assert_eq!(fmt_num(590.0), "590");
        assert_eq!(fmt_num(4.7), "4.7");
        assert_eq!(fmt_num(0.935628), "0.94");
        assert_eq!(fmt_num(2.10), "2.1");
    }

    #[test]
    fn test_greetings() {
        assert!(greeting("salut").starts_with("Salut invocateur"));
        assert!(greeting("bonjour").starts_with("Bonjour invocateur"));
        assert!(greeting("hi").contains("coach LoL"));
    }

    #[test]
    fn test_stats_layout() {
        let reply = stats(&enriched(fixtures::ahri())).unwrap();
        assert!(reply.starts_with("Statistiques complètes de Ahri :"));
        assert!(reply.contains("- PV : 590 (+96 par niveau)"));
        assert!(reply.contains("- Mana : 418 (+25 par niveau)"));
        assert!(reply.contains("\nNiveau 18 :\n- PV : 2222"));
        assert!(!reply.contains("Niveau 1 :"));
        assert!(reply.contains("- Dégâts magiques : 54/100"));
        assert!(reply.ends_with("- Scaling : 6.5/10"));
    }

    #[test]
    fn test_stats_skip_mana() {
        let reply = stats(&enriched(fixtures::garen())).unwrap();
        assert!(!reply.contains("Mana"));
    }

    #[test]
    fn test_ability_detail() {
        let ahri = enriched(fixtures::ahri());
        let reply = ability(&ahri, Some(AbilitySlot::Active(AbilityKey::Q))).unwrap();
        assert!(reply.starts_with("Capacité Q de Ahri - Orbe d'illusion:"));
        assert!(reply.contains("- Cooldown par niveau : 7, 7, 7, 7, 7 secondes"));
        assert!(reply.contains("- Coût par niveau : 55, 65, 75, 85, 95 Mana"));
        assert!(reply.contains("- Portée par niveau : 880, 880, 880, 880, 880 unités"));
        assert!(reply.ends_with("- 20% AP"));

        let reply = ability(&ahri, Some(AbilitySlot::Passive)).unwrap();
        assert!(reply.starts_with("Passif de Ahri - Vol d'essence:"));
        assert!(!reply.contains("Ratios"));
    }

    #[test]
    fn test_ability_without_cost() {
        let garen = enriched(fixtures::garen());
        let reply = ability(&garen, Some(AbilitySlot::Active(AbilityKey::E))).unwrap();
        assert!(!reply.contains("Coût"));
    }

    #[test]
    fn test_ability_without_slot_falls_through() {
        assert!(ability(&enriched(fixtures::ahri()), None).is_none());
    }

    #[tokio::test]
    async fn test_matchups() {
        let table = StaticMatchupTable::builtin()
            .matchups("Ahri", Role::Mid)
            .await
            .unwrap()
            .unwrap();
        let reply = matchups("Ahri", &table).unwrap();
        assert!(reply.starts_with("Analyse des matchups pour Ahri en mid :"));
        assert!(reply.contains("Contre-picks difficiles :\n- Kassadin (47.5% de victoires)"));
        assert!(reply.contains("Meilleures synergies :"));

        let empty = MatchupTable {
            champion: "Ahri".to_string(),
            role: Role::Mid,
            counter_picks: vec![],
            good_against: vec![],
            synergies: vec![],
        };
        assert!(matchups("Ahri", &empty).is_none());
        assert!(matchups_missing("Teemo").contains("matchups de Teemo"));
    }

    #[test]
    fn test_champion_info() {
        let reply = champion_info(&enriched(fixtures::ahri())).unwrap();
        assert!(reply.starts_with("Ahri est le renard à neuf queues."));
        assert!(reply.contains("- Survie : 2222 PV au niveau 18"));
        assert!(reply.contains("Capacités :\n- Passif : Vol d'essence"));
        assert!(reply.contains("- R : Ruée spirituelle"));
        assert!(reply.contains("Conseils pour jouer ce champion :\n- Utilisez Charme"));
        assert!(!reply.contains("..."));

        let mut long = fixtures::ahri();
        long.lore = "é".repeat(300);
        let reply = champion_info(&enriched(long)).unwrap();
        assert!(reply.contains(&format!("Histoire : {}...", "é".repeat(200))));
    }

    #[test]
    fn test_topics() {
        assert!(mana(&fixtures::ahri()).contains("Mana de base : 418"));
        assert_eq!(
            mana(&fixtures::garen()),
            "Garen n'utilise pas de mana comme ressource."
        );

        let reply = trade(&fixtures::caitlyn());
        assert!(reply.contains("- Fort en auto-attaques"));
        assert!(reply.ends_with("Distance d'attaque : 650 unités"));

        assert!(position(&fixtures::caitlyn()).contains("Restez derrière votre équipe"));
        assert!(position(&fixtures::garen()).contains("Positionnez-vous devant"));
        assert!(position(&fixtures::ahri()).contains("angles de flank"));

        let reply = combo(&fixtures::ahri()).unwrap();
        assert!(reply.contains("1. Q - Orbe d'illusion (7 s)"));
        assert!(reply.contains("Astuce : Utilisez Charme"));

        assert!(objective(&fixtures::garen(), Some(Role::Top)).starts_with("Conseils d'objectifs pour Garen en top"));
        assert!(objective(&fixtures::garen(), None).contains("combat gagné"));
    }
}
