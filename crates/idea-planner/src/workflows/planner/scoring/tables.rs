pub(crate) const TOP_BUDGET_TIER: &str = "$500,000+";
pub(crate) const UNSURE_BUDGET_TIER: &str = "I have no idea";

pub(crate) const BUDGET_POINTS: &[(&str, u8)] = &[
    ("Less than $50,000", 5),
    ("$50,000 - $150,000", 15),
    ("$150,000 - $300,000", 25),
    ("$300,000 - $500,000", 35),
    (TOP_BUDGET_TIER, 40),
    (UNSURE_BUDGET_TIER, 10),
];

pub(crate) const STAGE_POINTS: &[(&str, u8)] = &[
    ("Napkin sketch / concept only", 10),
    ("Detailed drawings or CAD models", 15),
    ("Basic prototype (non-functional or rough)", 20),
    ("Working prototype", 25),
    ("Already using informally in my practice", 30),
];

pub(crate) const PRACTITIONER_POINTS: u8 = 20;

pub(crate) const TIME_POINTS: &[(&str, u8)] = &[
    ("Less than 2 hours", 2),
    ("2-5 hours", 5),
    ("5-10 hours", 8),
    ("10+ hours", 10),
];

pub(crate) fn lookup(table: &[(&str, u8)], answer: &str) -> Option<u8> {
    table
        .iter()
        .find(|(option, _)| *option == answer)
        .map(|(_, points)| *points)
}
