mod application;
mod internship;
mod order;

pub use application::{
    Applicant, Application, ApplicationId, ApplicationStatus, Message, MessageSender,
    StudentApplicationStatus,
};
pub use internship::{
    ContactInfo, Internship, InternshipId, InternshipStatus, StipendKind, UNPAID_STIPEND,
};
pub use order::{CustomerSummary, Order, OrderId, OrderPriority, OrderStatus, ProductSummary};

/// Closed enumeration with a canonical display order, a wire code and a label.
pub trait Vocabulary: Copy + Eq + 'static {
    fn ordered() -> &'static [Self];
    fn code(self) -> &'static str;
    fn label(self) -> &'static str;

    /// Accepts either the wire code or the label, ignoring case, spaces and dashes.
    fn parse(raw: &str) -> Option<Self> {
        let wanted = normalize(raw);
        Self::ordered()
            .iter()
            .copied()
            .find(|value| normalize(value.code()) == wanted || normalize(value.label()) == wanted)
    }
}

/// Records that carry a status drawn from a [`Vocabulary`].
pub trait HasStatus {
    type Status: Vocabulary;

    fn status(&self) -> Self::Status;
}

fn normalize(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|ch| match ch {
            ' ' | '-' => '_',
            other => other.to_ascii_lowercase(),
        })
        .collect()
}

macro_rules! vocabulary_from_str {
    ($($ty:ty => $what:literal),+ $(,)?) => {
        $(
            impl std::str::FromStr for $ty {
                type Err = String;

                fn from_str(raw: &str) -> Result<Self, Self::Err> {
                    <$ty as Vocabulary>::parse(raw)
                        .ok_or_else(|| format!("unknown {} '{}'", $what, raw.trim()))
                }
            }
        )+
    };
}

vocabulary_from_str!(
    InternshipStatus => "internship status",
    StipendKind => "stipend kind",
    ApplicationStatus => "application status",
    StudentApplicationStatus => "student application status",
    OrderStatus => "order status",
    OrderPriority => "order priority",
);
