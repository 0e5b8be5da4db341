//! Static reference catalog of the 78 Tarot cards.
//!
//! The catalog is pure data: the 22 major arcana in canonical order and the
//! four minor suits, each with fourteen ranked cards named `"{rank} de {suit}"`.

use crate::model::CardName;

//
// ─── ARCANA ───────────────────────────────────────────────────────────────────
//

/// Top-level card category a learner browses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arcana {
    Major,
    Minor,
}

impl Arcana {
    pub const ALL: [Arcana; 2] = [Arcana::Major, Arcana::Minor];

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Arcana::Major => "Arcanos Mayores",
            Arcana::Minor => "Arcanos Menores",
        }
    }

    #[must_use]
    pub fn tagline(self) -> &'static str {
        match self {
            Arcana::Major => "El viaje del alma y las grandes lecciones de la vida.",
            Arcana::Minor => "Las experiencias y desafíos del día a día.",
        }
    }
}

/// The 22 major arcana, from "El Loco" (0) to "El Mundo" (XXI).
pub const MAJOR_ARCANA: [&str; 22] = [
    "El Loco",
    "El Mago",
    "La Sacerdotisa",
    "La Emperatriz",
    "El Emperador",
    "El Hierofante",
    "Los Enamorados",
    "El Carro",
    "La Fuerza",
    "El Ermitaño",
    "La Rueda de la Fortuna",
    "La Justicia",
    "El Colgado",
    "La Muerte",
    "La Templanza",
    "El Diablo",
    "La Torre",
    "La Estrella",
    "La Luna",
    "El Sol",
    "El Juicio",
    "El Mundo",
];

//
// ─── SUITS & RANKS ────────────────────────────────────────────────────────────
//

/// Minor arcana suit, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Suit {
    Bastos,
    Copas,
    Espadas,
    Oros,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Bastos, Suit::Copas, Suit::Espadas, Suit::Oros];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Suit::Bastos => "Bastos",
            Suit::Copas => "Copas",
            Suit::Espadas => "Espadas",
            Suit::Oros => "Oros",
        }
    }
}

/// Rank of a minor arcana card: Ace, Two..Ten, Page, Knight, Queen, King.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rank {
    As,
    Dos,
    Tres,
    Cuatro,
    Cinco,
    Seis,
    Siete,
    Ocho,
    Nueve,
    Diez,
    Sota,
    Caballo,
    Reina,
    Rey,
}

impl Rank {
    pub const ALL: [Rank; 14] = [
        Rank::As,
        Rank::Dos,
        Rank::Tres,
        Rank::Cuatro,
        Rank::Cinco,
        Rank::Seis,
        Rank::Siete,
        Rank::Ocho,
        Rank::Nueve,
        Rank::Diez,
        Rank::Sota,
        Rank::Caballo,
        Rank::Reina,
        Rank::Rey,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Rank::As => "As",
            Rank::Dos => "Dos",
            Rank::Tres => "Tres",
            Rank::Cuatro => "Cuatro",
            Rank::Cinco => "Cinco",
            Rank::Seis => "Seis",
            Rank::Siete => "Siete",
            Rank::Ocho => "Ocho",
            Rank::Nueve => "Nueve",
            Rank::Diez => "Diez",
            Rank::Sota => "Sota",
            Rank::Caballo => "Caballo",
            Rank::Reina => "Reina",
            Rank::Rey => "Rey",
        }
    }

    /// Formats the card name for this rank within `suit`.
    #[must_use]
    pub fn card_in(self, suit: Suit) -> CardName {
        CardName::new(format!("{} de {}", self.label(), suit.label()))
    }
}

//
// ─── LOOKUPS ──────────────────────────────────────────────────────────────────
//

/// The major arcana as card names, in canonical order.
#[must_use]
pub fn major_arcana() -> Vec<CardName> {
    MAJOR_ARCANA.iter().copied().map(CardName::from).collect()
}

/// The fourteen cards of `suit`, in rank order.
#[must_use]
pub fn suit_cards(suit: Suit) -> Vec<CardName> {
    Rank::ALL.iter().map(|rank| rank.card_in(suit)).collect()
}

/// Every suit paired with its cards, in suit display order.
#[must_use]
pub fn minor_arcana() -> Vec<(Suit, Vec<CardName>)> {
    Suit::ALL
        .iter()
        .map(|&suit| (suit, suit_cards(suit)))
        .collect()
}

/// All cards belonging to `arcana`, flattened in display order.
#[must_use]
pub fn cards_for(arcana: Arcana) -> Vec<CardName> {
    match arcana {
        Arcana::Major => major_arcana(),
        Arcana::Minor => Suit::ALL.iter().flat_map(|&suit| suit_cards(suit)).collect(),
    }
}

/// All 78 cards: major arcana first, then each suit.
#[must_use]
pub fn all_cards() -> Vec<CardName> {
    Arcana::ALL
        .iter()
        .flat_map(|&arcana| cards_for(arcana))
        .collect()
}

/// Returns which arcana a card belongs to, or `None` for unknown names.
#[must_use]
pub fn arcana_of(name: &str) -> Option<Arcana> {
    if MAJOR_ARCANA.iter().any(|card| *card == name) {
        return Some(Arcana::Major);
    }
    let (rank, suit) = name.split_once(" de ")?;
    let known_rank = Rank::ALL.iter().any(|r| r.label() == rank);
    let known_suit = Suit::ALL.iter().any(|s| s.label() == suit);
    (known_rank && known_suit).then_some(Arcana::Minor)
}

#[must_use]
pub fn contains(name: &str) -> bool {
    arcana_of(name).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn major_arcana_has_22_cards_in_canonical_order() {
        let major = major_arcana();
        assert_eq!(major.len(), 22);
        assert_eq!(major[0], "El Loco");
        assert_eq!(major[1], "El Mago");
        assert_eq!(major[21], "El Mundo");
    }

    #[test]
    fn each_suit_has_14_cards_in_rank_order() {
        let minor = minor_arcana();
        assert_eq!(minor.len(), 4);
        for (suit, cards) in &minor {
            assert_eq!(cards.len(), 14);
            let expected: Vec<String> = [
                "As", "Dos", "Tres", "Cuatro", "Cinco", "Seis", "Siete", "Ocho", "Nueve", "Diez",
                "Sota", "Caballo", "Reina", "Rey",
            ]
            .iter()
            .map(|rank| format!("{rank} de {}", suit.label()))
            .collect();
            let actual: Vec<&str> = cards.iter().map(CardName::as_str).collect();
            assert_eq!(actual, expected);
        }
    }

    #[test]
    fn names_are_non_empty_and_unique() {
        let all = all_cards();
        assert_eq!(all.len(), 78);
        let unique: HashSet<&str> = all.iter().map(CardName::as_str).collect();
        assert_eq!(unique.len(), all.len());
        assert!(all.iter().all(|name| !name.as_str().is_empty()));
    }

    #[test]
    fn arcana_lookup_covers_both_namespaces() {
        assert_eq!(arcana_of("La Torre"), Some(Arcana::Major));
        assert_eq!(arcana_of("As de Copas"), Some(Arcana::Minor));
        assert_eq!(arcana_of("Rey de Oros"), Some(Arcana::Minor));
        assert_eq!(arcana_of("As de Corazones"), None);
        assert_eq!(arcana_of("El Bufón"), None);
        assert!(all_cards().iter().all(|name| contains(name.as_str())));
    }

    #[test]
    fn cards_for_minor_flattens_suits_in_order() {
        let minor = cards_for(Arcana::Minor);
        assert_eq!(minor.len(), 56);
        assert_eq!(minor[0], "As de Bastos");
        assert_eq!(minor[14], "As de Copas");
        assert_eq!(minor[55], "Rey de Oros");
    }
}
