pub mod fields;

use serde::Serialize;

use crate::error::InvalidDate;
use crate::extract::RawRecord;
use fields::{clean_education, clean_job, last_contact_date, success_flag, yes_flag};

/// Row of `client.csv`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientRecord {
    pub client_id: String,
    pub age: String,
    pub job: String,
    pub marital: String,
    pub education: Option<String>,
    pub credit_default: u8,
    pub mortgage: u8,
}

/// Row of `campaign.csv`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CampaignRecord {
    pub client_id: String,
    pub number_contacts: String,
    pub contact_duration: String,
    pub previous_campaign_contacts: String,
    pub previous_outcome: u8,
    pub campaign_outcome: u8,
    pub last_contact_date: String,
}

/// Row of `economics.csv`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EconomicsRecord {
    pub client_id: String,
    pub cons_price_idx: String,
    pub euribor_three_months: String,
}

impl ClientRecord {
    pub fn derive(raw: &RawRecord) -> Self {
        ClientRecord {
            client_id: raw.client_id.clone(),
            age: raw.age.clone(),
            job: clean_job(&raw.job),
            marital: raw.marital.clone(),
            education: clean_education(&raw.education),
            credit_default: yes_flag(&raw.credit_default),
            mortgage: yes_flag(&raw.mortgage),
        }
    }
}

impl CampaignRecord {
    pub fn derive(raw: &RawRecord) -> Result<Self, InvalidDate> {
        Ok(CampaignRecord {
            client_id: raw.client_id.clone(),
            number_contacts: raw.number_contacts.clone(),
            contact_duration: raw.contact_duration.clone(),
            previous_campaign_contacts: raw.previous_campaign_contacts.clone(),
            previous_outcome: success_flag(&raw.previous_outcome),
            campaign_outcome: yes_flag(&raw.campaign_outcome),
            last_contact_date: last_contact_date(&raw.day, &raw.month)?,
        })
    }
}

impl EconomicsRecord {
    pub fn derive(raw: &RawRecord) -> Self {
        EconomicsRecord {
            client_id: raw.client_id.clone(),
            cons_price_idx: raw.cons_price_idx.clone(),
            euribor_three_months: raw.euribor_three_months.clone(),
        }
    }
}

/// The three records one raw row splits into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitRow {
    pub client: ClientRecord,
    pub campaign: CampaignRecord,
    pub economics: EconomicsRecord,
}

/// Split a raw row; fails only when its contact date is invalid.
pub fn split_row(raw: &RawRecord) -> Result<SplitRow, InvalidDate> {
    Ok(SplitRow {
        client: ClientRecord::derive(raw),
        campaign: CampaignRecord::derive(raw)?,
        economics: EconomicsRecord::derive(raw),
    })
}
