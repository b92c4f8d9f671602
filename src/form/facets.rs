//! Multi-facet flag sets where some facets exclude all others.
//!
//! A facet set is stored as `Option<S>`: `None` means "not answered", while
//! `Some(S)` always has at least one facet switched on. The rule table of each
//! set names the exclusive facets; [`toggle_facet`] applies the table.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One row of a facet rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FacetRule<F> {
    pub facet: F,
    pub key: &'static str,
    pub exclusive: bool,
}

impl<F> FacetRule<F> {
    pub const fn shared(facet: F, key: &'static str) -> Self {
        Self {
            facet,
            key,
            exclusive: false,
        }
    }

    pub const fn exclusive(facet: F, key: &'static str) -> Self {
        Self {
            facet,
            key,
            exclusive: true,
        }
    }
}

/// Flag record addressed facet by facet.
pub trait FacetSet: Clone + Default + PartialEq {
    type Facet: Copy + Eq + fmt::Debug + 'static;

    const RULES: &'static [FacetRule<Self::Facet>];

    fn is_set(&self, facet: Self::Facet) -> bool;

    fn assign(&mut self, facet: Self::Facet, on: bool);

    fn is_exclusive(facet: Self::Facet) -> bool {
        Self::RULES
            .iter()
            .any(|rule| rule.facet == facet && rule.exclusive)
    }

    fn any_set(&self) -> bool {
        Self::RULES.iter().any(|rule| self.is_set(rule.facet))
    }

    fn active_keys(&self) -> Vec<&'static str> {
        Self::RULES
            .iter()
            .filter(|rule| self.is_set(rule.facet))
            .map(|rule| rule.key)
            .collect()
    }

    fn parse_facet(key: &str) -> Option<Self::Facet> {
        let needle = key.trim();
        Self::RULES
            .iter()
            .find(|rule| rule.key.eq_ignore_ascii_case(needle))
            .map(|rule| rule.facet)
    }

    fn facet_keys() -> Vec<&'static str> {
        Self::RULES.iter().map(|rule| rule.key).collect()
    }
}

/// Flips `facet` and returns the next value of the set.
///
/// Switching on an exclusive facet clears every other facet; switching on a
/// shared facet clears the exclusive ones. Switching off the last active facet
/// collapses the set to `None`.
pub fn toggle_facet<S: FacetSet>(current: Option<&S>, facet: S::Facet) -> Option<S> {
    let mut next = current.cloned().unwrap_or_default();

    if next.is_set(facet) {
        next.assign(facet, false);
        return if next.any_set() { Some(next) } else { None };
    }

    if S::is_exclusive(facet) {
        next = S::default();
    } else {
        for rule in S::RULES.iter().filter(|rule| rule.exclusive) {
            next.assign(rule.facet, false);
        }
    }
    next.assign(facet, true);
    Some(next)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WohnFacet {
    LebtAllein,
    MitPartner,
    MitKindern,
    BeiEltern,
    InWg,
}

/// Living situation (chapter 3). "Lives alone" excludes every other facet.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Wohnsituation {
    pub lebt_allein: bool,
    pub mit_partner: bool,
    pub mit_kindern: bool,
    pub bei_eltern: bool,
    #[serde(rename = "inWG")]
    pub in_wg: bool,
}

impl FacetSet for Wohnsituation {
    type Facet = WohnFacet;

    const RULES: &'static [FacetRule<WohnFacet>] = &[
        FacetRule::exclusive(WohnFacet::LebtAllein, "lebtAllein"),
        FacetRule::shared(WohnFacet::MitPartner, "mitPartner"),
        FacetRule::shared(WohnFacet::MitKindern, "mitKindern"),
        FacetRule::shared(WohnFacet::BeiEltern, "beiEltern"),
        FacetRule::shared(WohnFacet::InWg, "inWG"),
    ];

    fn is_set(&self, facet: WohnFacet) -> bool {
        match facet {
            WohnFacet::LebtAllein => self.lebt_allein,
            WohnFacet::MitPartner => self.mit_partner,
            WohnFacet::MitKindern => self.mit_kindern,
            WohnFacet::BeiEltern => self.bei_eltern,
            WohnFacet::InWg => self.in_wg,
        }
    }

    fn assign(&mut self, facet: WohnFacet, on: bool) {
        match facet {
            WohnFacet::LebtAllein => self.lebt_allein = on,
            WohnFacet::MitPartner => self.mit_partner = on,
            WohnFacet::MitKindern => self.mit_kindern = on,
            WohnFacet::BeiEltern => self.bei_eltern = on,
            WohnFacet::InWg => self.in_wg = on,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuizidFacet {
    Keine,
    PassiveTodeswuensche,
    Gedanken,
    Plaene,
    Versuche,
}

/// Suicidality findings (chapter 5). "None" excludes every other facet.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Suizidalitaet {
    pub keine: bool,
    pub passive_todeswuensche: bool,
    pub gedanken: bool,
    pub plaene: bool,
    pub versuche: bool,
}

impl FacetSet for Suizidalitaet {
    type Facet = SuizidFacet;

    const RULES: &'static [FacetRule<SuizidFacet>] = &[
        FacetRule::exclusive(SuizidFacet::Keine, "keine"),
        FacetRule::shared(SuizidFacet::PassiveTodeswuensche, "passiveTodeswuensche"),
        FacetRule::shared(SuizidFacet::Gedanken, "gedanken"),
        FacetRule::shared(SuizidFacet::Plaene, "plaene"),
        FacetRule::shared(SuizidFacet::Versuche, "versuche"),
    ];

    fn is_set(&self, facet: SuizidFacet) -> bool {
        match facet {
            SuizidFacet::Keine => self.keine,
            SuizidFacet::PassiveTodeswuensche => self.passive_todeswuensche,
            SuizidFacet::Gedanken => self.gedanken,
            SuizidFacet::Plaene => self.plaene,
            SuizidFacet::Versuche => self.versuche,
        }
    }

    fn assign(&mut self, facet: SuizidFacet, on: bool) {
        match facet {
            SuizidFacet::Keine => self.keine = on,
            SuizidFacet::PassiveTodeswuensche => self.passive_todeswuensche = on,
            SuizidFacet::Gedanken => self.gedanken = on,
            SuizidFacet::Plaene => self.plaene = on,
            SuizidFacet::Versuche => self.versuche = on,
        }
    }
}
