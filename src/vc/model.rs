use serde::{Deserialize, Serialize};

use crate::util::slugify;

pub const UNKNOWN: &str = "Unknown";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FundStatus {
    Fundraising,
    Investing,
    Harvesting,
    Closed,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubFund {
    pub id: String,
    pub name: String,
    pub size: String,
    pub vintage: i32,
    pub status: FundStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moic: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub irr: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dpi: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tvpi: Option<f64>,
    #[serde(default)]
    pub investments: Vec<String>,
    #[serde(default)]
    pub team_members: Vec<String>,
}

impl SubFund {
    /// The vintage-2020 "Fund I" every newly discovered organization starts with.
    pub fn seeded(organization_id: &str, organization_name: &str) -> Self {
        Self {
            id: format!("{organization_id}-fund-i"),
            name: seeded_sub_fund_name(organization_name),
            size: UNKNOWN.to_owned(),
            vintage: 2020,
            status: FundStatus::Investing,
            moic: None,
            irr: None,
            dpi: None,
            tvpi: None,
            investments: Vec::new(),
            team_members: Vec::new(),
        }
    }
}

pub fn seeded_sub_fund_name(organization_name: &str) -> String {
    format!("{organization_name} Fund I")
}

/// A venture firm. `team_size` is derived from `current_team` and members are
/// only added through [`Organization::add_current_member`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub founded_year: i32,
    pub geography: Vec<String>,
    #[serde(default)]
    pub sector_focus: Vec<String>,
    pub fund_size: String,
    #[serde(default)]
    pub stage: Vec<String>,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    current_team: Vec<String>,
    #[serde(default)]
    pub past_team: Vec<String>,
    #[serde(default)]
    pub growth_rate: f64,
    pub influence_score: u8,
    #[serde(default)]
    pub sub_funds: Vec<SubFund>,
}

impl Organization {
    /// Builds an organization with the defaults used when a fund is first seen
    /// in someone's work history.
    pub fn discovered(name: &str, geography: Vec<String>, website: String) -> Self {
        Self::discovered_with_id(slugify(name), name, geography, website)
    }

    /// Same as [`Organization::discovered`] with an explicit id, for names
    /// whose slug is already taken by another organization.
    pub fn discovered_with_id(
        id: String,
        name: &str,
        geography: Vec<String>,
        website: String,
    ) -> Self {
        let sub_funds = vec![SubFund::seeded(&id, name)];

        Self {
            id,
            name: name.to_owned(),
            description: String::new(),
            founded_year: 2000,
            geography,
            sector_focus: Vec::new(),
            fund_size: UNKNOWN.to_owned(),
            stage: vec!["Seed".to_owned(), "Series A".to_owned()],
            website,
            current_team: Vec::new(),
            past_team: Vec::new(),
            growth_rate: 0.0,
            influence_score: 50,
            sub_funds,
        }
    }

    pub fn current_team(&self) -> &[String] {
        &self.current_team
    }

    pub fn team_size(&self) -> usize {
        self.current_team.len()
    }

    pub fn add_current_member(&mut self, person_id: &str) {
        self.current_team.push(person_id.to_owned());
        if let Some(sub_fund) = self.sub_funds.first_mut() {
            sub_fund.team_members.push(person_id.to_owned());
        }
    }

    /// Drops members for which `keep` is false, from the team and from every
    /// sub-fund roster.
    pub fn retain_members(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.current_team.retain(|id| keep(id));
        for sub_fund in &mut self.sub_funds {
            sub_fund.team_members.retain(|id| keep(id));
        }
    }

    pub fn portfolio_size(&self) -> usize {
        self.sub_funds
            .iter()
            .map(|sub_fund| sub_fund.investments.len())
            .sum()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviousRole {
    pub company: String,
    pub role: String,
    pub start_year: i32,
    pub end_year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_month: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_month: Option<u8>,
    pub is_fund: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub institution: String,
    pub degree: String,
    pub field: String,
    pub graduation_year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_month: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_month: Option<u8>,
}

/// Where a person currently works. Only the first job slot can make someone
/// affiliated, and only when that employer is classified as a fund.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CurrentAffiliation {
    #[default]
    Unaffiliated,
    #[serde(rename_all = "camelCase")]
    Fund {
        organization: String,
        organization_id: String,
        sub_fund: String,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: String,
    pub name: String,
    pub current_role: String,
    #[serde(default)]
    pub current: CurrentAffiliation,
    #[serde(default)]
    pub previous_roles: Vec<PreviousRole>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    pub location: String,
    #[serde(default)]
    pub profile_url: String,
    #[serde(default)]
    pub connections: Vec<String>,
    pub influence: u8,
    pub tenure: u32,
    #[serde(default)]
    pub invested_companies: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_contacted_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_contact_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_strength: Option<String>,
}

impl Person {
    pub fn current_organization(&self) -> &str {
        match &self.current {
            CurrentAffiliation::Fund { organization, .. } => organization.as_str(),
            CurrentAffiliation::Unaffiliated => UNKNOWN,
        }
    }

    pub fn current_organization_id(&self) -> Option<&str> {
        match &self.current {
            CurrentAffiliation::Fund {
                organization_id, ..
            } => Some(organization_id.as_str()),
            CurrentAffiliation::Unaffiliated => None,
        }
    }

    pub fn current_sub_fund(&self) -> Option<&str> {
        match &self.current {
            CurrentAffiliation::Fund { sub_fund, .. } => Some(sub_fund.as_str()),
            CurrentAffiliation::Unaffiliated => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionType {
    Education,
    PreviousCompany,
    LinkedinMutual,
    Accelerator,
    CoAuthored,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub id: String,
    pub person1: String,
    pub person2: String,
    pub connection_type: ConnectionType,
    pub strength: f32,
    #[serde(default)]
    pub details: String,
}

impl Connection {
    pub fn new(
        id: impl Into<String>,
        person1: impl Into<String>,
        person2: impl Into<String>,
        connection_type: ConnectionType,
        strength: f32,
    ) -> Self {
        Self {
            id: id.into(),
            person1: person1.into(),
            person2: person2.into(),
            connection_type,
            strength: clamp_strength(strength),
            details: String::new(),
        }
    }
}

pub(crate) fn clamp_strength(strength: f32) -> f32 {
    if strength.is_nan() {
        0.0
    } else {
        strength.clamp(0.0, 1.0)
    }
}

/// Everything the layout engine and the query helpers consume.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub people: Vec<Person>,
    pub organizations: Vec<Organization>,
    #[serde(default)]
    pub connections: Vec<Connection>,
}

impl Dataset {
    pub fn person(&self, id: &str) -> Option<&Person> {
        self.people.iter().find(|person| person.id == id)
    }

    pub fn organization(&self, id: &str) -> Option<&Organization> {
        self.organizations
            .iter()
            .find(|organization| organization.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn team_size_tracks_current_team() {
        let mut organization =
            Organization::discovered("Example Ventures", vec![UNKNOWN.to_owned()], String::new());
        assert_eq!(organization.id, "example-ventures");
        assert_eq!(organization.team_size(), 0);

        organization.add_current_member("person-0");
        organization.add_current_member("person-3");
        assert_eq!(organization.team_size(), 2);
        assert_eq!(organization.current_team(), ["person-0", "person-3"]);
        assert_eq!(
            organization.sub_funds[0].team_members,
            vec!["person-0".to_owned(), "person-3".to_owned()]
        );
    }

    #[test]
    fn seeded_sub_fund_defaults() {
        let organization =
            Organization::discovered("Acme Capital", vec!["US".to_owned()], String::new());
        let sub_fund = &organization.sub_funds[0];
        assert_eq!(sub_fund.id, "acme-capital-fund-i");
        assert_eq!(sub_fund.name, "Acme Capital Fund I");
        assert_eq!(sub_fund.vintage, 2020);
        assert_eq!(sub_fund.status, FundStatus::Investing);
        assert_eq!(organization.stage, vec!["Seed", "Series A"]);
        assert_eq!(organization.founded_year, 2000);
    }

    #[test]
    fn explicit_id_carries_into_the_seeded_sub_fund() {
        let organization = Organization::discovered_with_id(
            "acme-capital-2".to_owned(),
            "ACME CAPITAL",
            vec!["US".to_owned()],
            String::new(),
        );
        assert_eq!(organization.id, "acme-capital-2");
        assert_eq!(organization.sub_funds[0].id, "acme-capital-2-fund-i");
        assert_eq!(organization.sub_funds[0].name, "ACME CAPITAL Fund I");
    }

    #[test]
    fn connection_strength_is_clamped() {
        let connection =
            Connection::new("c1", "person-0", "person-1", ConnectionType::Education, 1.7);
        assert_eq!(connection.strength, 1.0);

        let connection =
            Connection::new("c2", "person-0", "person-1", ConnectionType::Accelerator, -0.2);
        assert_eq!(connection.strength, 0.0);
    }

    #[test]
    fn connection_type_uses_snake_case_on_the_wire() {
        let json = r#"{"id":"c1","person1":"person-0","person2":"person-1",
            "connectionType":"linkedin_mutual","strength":0.5}"#;
        let connection: Connection = serde_json::from_str(json).unwrap();
        assert_eq!(connection.connection_type, ConnectionType::LinkedinMutual);
        assert!(connection.details.is_empty());
    }
}
