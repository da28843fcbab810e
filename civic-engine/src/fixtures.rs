//! Shared test fixtures.

use crate::spec::SurveySpec;
use crate::types::{ItemId, Response, SwipeEvent};

/// Small three-domain survey used across unit tests.
///
/// `econ` has two axes, `health` and `env` one each. `health_access` is
/// declared on a 0-10 range; every other axis uses the default range.
pub(crate) const TINY_SURVEY: &str = r#"
    [[domains]]
    id = "econ"
    name = "Economy"

    [[domains]]
    id = "health"
    name = "Health"

    [[domains]]
    id = "env"
    name = "Environment"

    [[axes]]
    id = "econ_markets"
    domain_id = "econ"
    name = "Markets"
    pole_low = "Regulated"
    pole_high = "Free"

    [[axes]]
    id = "econ_tax"
    domain_id = "econ"
    name = "Taxes"
    pole_low = "Low"
    pole_high = "Progressive"

    [[axes]]
    id = "health_access"
    domain_id = "health"
    name = "Access"
    pole_low = "Private"
    pole_high = "Public"
    range = [0.0, 10.0]

    [[axes]]
    id = "env_climate"
    domain_id = "env"
    name = "Climate"
    pole_low = "Minimal"
    pole_high = "Aggressive"

    [[items]]
    id = "econ-a"
    text = "Cut regulations."
    axes = [{ axis_id = "econ_markets", key = 1.0 }]

    [[items]]
    id = "econ-b"
    text = "Raise the minimum wage."
    axes = [{ axis_id = "econ_markets", key = -1.0 }]

    [[items]]
    id = "econ-c"
    text = "Free trade helps."
    axes = [{ axis_id = "econ_markets", key = 1.0 }]

    [[items]]
    id = "econ-d"
    text = "Deregulate housing."
    axes = [{ axis_id = "econ_markets", key = 1.0 }]

    [[items]]
    id = "econ-e"
    text = "Privatize utilities."
    axes = [{ axis_id = "econ_markets", key = 1.0 }]

    [[items]]
    id = "tax-a"
    text = "Tax the rich."
    axes = [{ axis_id = "econ_tax", key = 1.0 }]

    [[items]]
    id = "health-a"
    text = "Single payer."
    axes = [{ axis_id = "health_access", key = 1.0 }]

    [[items]]
    id = "health-b"
    text = "Expand Medicaid."
    axes = [{ axis_id = "health_access", key = 1.0 }]

    [[items]]
    id = "mixed-a"
    text = "Markets, not mandates, for health care."
    axes = [
        { axis_id = "econ_markets", key = 1.0 },
        { axis_id = "health_access", key = -1.0 },
    ]

    [[items]]
    id = "env-a"
    text = "Tax carbon."
    axes = [{ axis_id = "env_climate", key = 1.0 }]

    [[items]]
    id = "env-b"
    text = "Drill more."
    axes = [{ axis_id = "env_climate", key = -1.0 }]
"#;

pub(crate) fn tiny_spec() -> SurveySpec {
    SurveySpec::from_toml_str(TINY_SURVEY).expect("fixture survey is valid")
}

/// [`TINY_SURVEY`] plus a `civics` domain whose only axis has no items.
pub(crate) fn sparse_spec() -> SurveySpec {
    let survey = TINY_SURVEY.replacen(
        "    [[axes]]\n",
        r#"    [[domains]]
    id = "civics"
    name = "Civics"

    [[axes]]
    id = "civics_voice"
    domain_id = "civics"
    name = "Voice"
    pole_low = "Representative"
    pole_high = "Direct"

    [[axes]]
"#,
        1,
    );
    SurveySpec::from_toml_str(&survey).expect("sparse fixture survey is valid")
}

pub(crate) fn swipe(item_id: &str, response: Response) -> SwipeEvent {
    SwipeEvent::now(ItemId::from(item_id), response)
}
