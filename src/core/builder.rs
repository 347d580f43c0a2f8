use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::boundary::{PdfEmbedder, PdfMetadata, Validator, ViolationReport};
use super::currencies::normalize_currency;
use super::error::InvoiceError;
use super::gating::{Capabilities, Field};
use super::profile::{ConformanceLevel, Profile, ProfileRegistry, UnknownProfilePolicy};
use super::schemes;
use super::snapshot::*;
use super::tax::{MonetaryTotals, TaxAggregator, TaxBuckets};
use super::types::*;
use super::units::unit_code_problem;

/// Lifecycle of an [`InvoiceBuilder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuilderState {
    /// Accepting changes. No document is cached.
    Open,
    /// A document was rendered and is cached until the next change.
    Finalized,
}

/// Unified invoice facade: collects parties, lines and payment data, then
/// renders the document for its profile.
///
/// ```
/// use chrono::NaiveDate;
/// use digital_invoice::*;
/// use rust_decimal_macros::dec;
///
/// let mut invoice = InvoiceBuilder::new(
///     "F-2024-001",
///     NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
///     CiiProfile::En16931,
/// );
/// invoice
///     .seller(PartyBuilder::new("Seller SAS").vat_id("FR11123456782")
///         .address(AddressBuilder::new("Paris", "75001", "FR").build()).build())
///     .buyer("REF-7", PartyBuilder::new("Buyer SARL")
///         .address(AddressBuilder::new("Lyon", "69001", "FR").build()).build())
///     .add_line(LineItemBuilder::new("Consulting", dec!(1), "DAY", dec!(750))
///         .tax_rate(dec!(10)).build());
///
/// assert_eq!(invoice.compute().unwrap().grand_total, dec!(825.00));
/// ```
#[derive(Debug, Clone)]
pub struct InvoiceBuilder {
    profile: Profile,
    policy: UnknownProfilePolicy,
    number: String,
    issue_date: NaiveDate,
    delivery_date: Option<NaiveDate>,
    type_code: String,
    currency: String,
    notes: Vec<Note>,
    buyer_reference: Option<String>,
    seller: Option<Party>,
    buyer: Option<Party>,
    payee: Option<Party>,
    payee_is_seller: bool,
    ship_to: Option<Party>,
    lines: Vec<LineItem>,
    taxes: TaxBuckets,
    exemption: Option<TaxExemption>,
    payment_means: Option<PaymentMeans>,
    payment_terms: Option<PaymentTerms>,
    rejected: Vec<String>,
    state: BuilderState,
    rendered: Option<String>,
}

impl InvoiceBuilder {
    pub fn new(
        number: impl Into<String>,
        issue_date: NaiveDate,
        profile: impl Into<Profile>,
    ) -> Self {
        Self {
            profile: profile.into(),
            policy: UnknownProfilePolicy::default(),
            number: number.into(),
            issue_date,
            delivery_date: None,
            type_code: InvoiceTypeCode::Invoice.code().to_string(),
            currency: "EUR".to_string(),
            notes: Vec::new(),
            buyer_reference: None,
            seller: None,
            buyer: None,
            payee: None,
            payee_is_seller: false,
            ship_to: None,
            lines: Vec::new(),
            taxes: TaxBuckets::new(),
            exemption: None,
            payment_means: None,
            payment_terms: None,
            rejected: Vec::new(),
            state: BuilderState::Open,
            rendered: None,
        }
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn state(&self) -> BuilderState {
        self.state
    }

    pub fn unknown_profile_policy(&mut self, policy: UnknownProfilePolicy) -> &mut Self {
        self.policy = policy;
        self.touch()
    }

    pub fn delivery_date(&mut self, date: NaiveDate) -> &mut Self {
        self.delivery_date = Some(date);
        self.touch()
    }

    /// ISO 4217 code. Checked when the invoice is finalized.
    pub fn currency(&mut self, code: impl Into<String>) -> &mut Self {
        self.currency = code.into();
        self.touch()
    }

    /// UNTDID 1001 code such as `"380"`. Checked when the invoice is finalized.
    pub fn type_code(&mut self, code: impl Into<String>) -> &mut Self {
        self.type_code = code.into();
        self.touch()
    }

    pub fn invoice_type(&mut self, code: InvoiceTypeCode) -> &mut Self {
        self.type_code(code.code().to_string())
    }

    pub fn note(&mut self, content: impl Into<String>) -> &mut Self {
        self.notes.push(Note {
            content: content.into(),
            subject_code: None,
        });
        self.touch()
    }

    pub fn note_with_subject(
        &mut self,
        content: impl Into<String>,
        subject_code: impl Into<String>,
    ) -> &mut Self {
        self.notes.push(Note {
            content: content.into(),
            subject_code: Some(subject_code.into()),
        });
        self.touch()
    }

    pub fn seller(&mut self, party: Party) -> &mut Self {
        self.seller = Some(party);
        self.touch()
    }

    pub fn buyer(&mut self, reference: impl Into<String>, party: Party) -> &mut Self {
        self.buyer_reference = Some(reference.into());
        self.buyer = Some(party);
        self.touch()
    }

    pub fn payee(&mut self, party: Party) -> &mut Self {
        self.payee = Some(party);
        self.payee_is_seller = false;
        self.touch()
    }

    /// Declare the seller as payee. Resolved at finalize, so a later
    /// `seller` call is picked up. Dropped at MINIMUM.
    pub fn payee_is_seller(&mut self) -> &mut Self {
        self.payee = None;
        self.payee_is_seller = true;
        self.touch()
    }

    pub fn ship_to(&mut self, party: Party) -> &mut Self {
        self.ship_to = Some(party);
        self.touch()
    }

    /// Add an invoice line. Its net amount, rounded to two decimals, joins
    /// the bucket for its tax rate.
    pub fn add_line(&mut self, line: LineItem) -> &mut Self {
        match line.net_amount() {
            Some(net) => {
                if let Err(e) = self.taxes.add_line(line.tax_rate, net) {
                    self.rejected.push(format!("line '{}': {e}", line.name));
                }
            }
            None => self.rejected.push(format!(
                "line '{}': quantity × price exceeds the representable range",
                line.name
            )),
        }
        self.lines.push(line);
        self.touch()
    }

    /// Add a tax line without an invoice line (document-level breakdown).
    pub fn add_tax_line(&mut self, rate: Decimal, basis: Decimal) -> &mut Self {
        if let Err(e) = self.taxes.add_line(rate, basis) {
            self.rejected.push(e.to_string());
        }
        self.touch()
    }

    /// Declare document totals directly. Honored only by profiles without lines,
    /// and only while no tax lines were added.
    pub fn set_manual_totals(&mut self, basis: Decimal, tax: Decimal) -> &mut Self {
        self.taxes.set_manual_totals(basis, tax);
        self.touch()
    }

    pub fn payment_means(&mut self, means: PaymentMeans) -> &mut Self {
        self.payment_means = Some(means);
        self.touch()
    }

    pub fn payment_terms(&mut self, due_date: NaiveDate, description: Option<String>) -> &mut Self {
        self.payment_terms = Some(PaymentTerms {
            due_date,
            description,
        });
        self.touch()
    }

    /// Category and reason reported for zero-rated tax entries.
    pub fn tax_exemption(&mut self, category: VatCategory, reason: impl Into<String>) -> &mut Self {
        self.exemption = Some(TaxExemption {
            category,
            reason: reason.into(),
        });
        self.touch()
    }

    /// Conformance level for this invoice, after applying the unknown-profile policy.
    pub fn level(&self) -> Result<ConformanceLevel, InvoiceError> {
        ProfileRegistry::resolve(&self.profile, self.policy)
    }

    /// Compute monetary totals. Pure; nothing is cached.
    ///
    /// Fails if any line or tax line was rejected when it was added.
    pub fn compute(&self) -> Result<MonetaryTotals, InvoiceError> {
        if !self.rejected.is_empty() {
            return Err(InvoiceError::config(self.rejected.join("; ")));
        }
        self.compute_at(self.level()?)
    }

    /// The gated, immutable view handed to generators.
    pub fn snapshot(&self) -> Result<InvoiceSnapshot, InvoiceError> {
        let problems = self.code_problems();
        if !problems.is_empty() {
            return Err(InvoiceError::config(problems.join("; ")));
        }
        let level = self.level()?;
        let totals = self.compute_at(level)?;
        Ok(self.project(level, totals))
    }

    /// Render the document for this profile. The result is cached until the
    /// next change to the builder.
    pub fn to_xml(&mut self) -> Result<String, InvoiceError> {
        if let (BuilderState::Finalized, Some(xml)) = (self.state, &self.rendered) {
            tracing::debug!(number = %self.number, "serving cached invoice XML");
            return Ok(xml.clone());
        }
        let snapshot = self.snapshot()?;
        let generator = crate::render::generator_for(self.profile.syntax())?;
        let xml = generator.render(&snapshot)?;
        tracing::debug!(
            number = %self.number,
            profile = %self.profile,
            level = ?snapshot.level,
            bytes = xml.len(),
            "rendered invoice XML"
        );
        self.rendered = Some(xml.clone());
        self.state = BuilderState::Finalized;
        Ok(xml)
    }

    /// Title, subject, author and keywords for the PDF carrying this invoice.
    pub fn pdf_metadata(&self) -> Result<PdfMetadata, InvoiceError> {
        let seller = self
            .seller
            .as_ref()
            .ok_or_else(|| InvoiceError::config("seller is required for PDF metadata"))?;
        let type_code: InvoiceTypeCode = self.type_code.parse()?;
        Ok(PdfMetadata::new(
            &seller.name,
            type_code.display_name(),
            &self.number,
            self.issue_date,
        ))
    }

    /// Render the XML and hand it to `embedder`. Embedder errors pass through unchanged.
    pub fn embed_in_pdf(
        &mut self,
        pdf: &[u8],
        embedder: &dyn PdfEmbedder,
    ) -> Result<Vec<u8>, InvoiceError> {
        let xml = self.to_xml()?;
        let metadata = self.pdf_metadata()?;
        embedder
            .embed(pdf, &xml, &metadata)
            .map_err(InvoiceError::Collaborator)
    }

    /// Render the XML and check it with `validator`.
    pub fn validate(&mut self, validator: &dyn Validator) -> Result<ViolationReport, InvoiceError> {
        let xml = self.to_xml()?;
        validator
            .validate(&xml, &self.profile)
            .map_err(InvoiceError::Collaborator)
    }

    fn touch(&mut self) -> &mut Self {
        if self.rendered.take().is_some() {
            tracing::debug!(number = %self.number, "invoice changed, cached XML dropped");
        }
        self.state = BuilderState::Open;
        self
    }

    fn compute_at(&self, level: ConformanceLevel) -> Result<MonetaryTotals, InvoiceError> {
        let mut totals = TaxAggregator::compute(&self.taxes, level)?;
        if let Some(exemption) = &self.exemption {
            for entry in totals.breakdown.iter_mut().filter(|e| e.rate.is_zero()) {
                entry.category = exemption.category;
                entry.exemption_reason = Some(exemption.reason.clone());
            }
        }
        Ok(totals)
    }

    fn code_problems(&self) -> Vec<String> {
        let mut problems = self.rejected.clone();
        if let Err(e) = normalize_currency(&self.currency) {
            problems.push(e);
        }
        if self.type_code.parse::<InvoiceTypeCode>().is_err() {
            problems.push(format!("unknown invoice type '{}'", self.type_code));
        }
        for (i, line) in self.lines.iter().enumerate() {
            problems.extend(unit_code_problem(&line.unit));
            if let Some(scheme) = line.global_id.as_ref().and_then(|id| id.scheme.as_deref()) {
                problems.extend(schemes::scheme_problem(&format!("lines[{i}].global_id"), scheme));
            }
        }
        let parties = [
            ("seller", &self.seller),
            ("buyer", &self.buyer),
            ("payee", &self.payee),
            ("ship_to", &self.ship_to),
        ];
        for (path, party) in parties {
            if let Some(party) = party {
                problems.extend(party_scheme_problems(path, party));
            }
        }
        problems
    }

    fn payee_source(&self) -> Option<(&Party, PartyRole)> {
        if self.payee_is_seller {
            self.seller.as_ref().map(|p| (p, PartyRole::Seller))
        } else {
            self.payee.as_ref().map(|p| (p, PartyRole::Other))
        }
    }

    fn project(&self, level: ConformanceLevel, totals: MonetaryTotals) -> InvoiceSnapshot {
        let caps = Capabilities::for_level(level);
        let lines = if caps.allows(Field::LineItems) {
            self.lines
                .iter()
                .enumerate()
                .map(|(i, l)| project_line(i, l, self.exemption.as_ref(), caps))
                .collect()
        } else {
            Vec::new()
        };
        let tax_breakdown = if caps.allows(Field::TaxBreakdown) {
            totals.breakdown.clone()
        } else {
            Vec::new()
        };
        let notes = if caps.allows(Field::Notes) {
            self.notes.clone()
        } else {
            Vec::new()
        };

        InvoiceSnapshot {
            profile: self.profile.clone(),
            level,
            header: DocumentHeader {
                number: self.number.clone(),
                issue_date: self.issue_date,
                delivery_date: self.delivery_date,
                type_code: self.type_code.parse().unwrap_or(InvoiceTypeCode::Invoice),
                currency: self.currency.trim().to_ascii_uppercase(),
                buyer_reference: self.buyer_reference.clone(),
                notes,
            },
            seller: self
                .seller
                .as_ref()
                .map(|p| project_party(p, PartyRole::Seller, caps)),
            buyer: self
                .buyer
                .as_ref()
                .map(|p| project_party(p, PartyRole::Buyer, caps)),
            payee: caps
                .keep(Field::PayeeParty, self.payee_source())
                .map(|(p, role)| project_party(p, role, caps)),
            ship_to: caps
                .keep(Field::ShipToParty, self.ship_to.as_ref())
                .map(|p| project_party(p, PartyRole::Other, caps)),
            lines,
            tax_breakdown,
            line_total: caps.keep(Field::LineTotalAmount, Some(totals.line_total)),
            totals,
            payment_means: project_payment_means(self.payment_means.as_ref(), caps),
            payment_terms: project_terms(self.payment_terms.as_ref(), caps),
        }
    }
}

/// Builder for [`Party`].
pub struct PartyBuilder {
    party: Party,
}

impl PartyBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            party: Party {
                name: name.into(),
                legal_id: None,
                trading_name: None,
                id: None,
                identifiers: Vec::new(),
                tax_registrations: Vec::new(),
                address: None,
                contact: None,
                electronic_address: None,
            },
        }
    }

    pub fn address(mut self, address: Address) -> Self {
        self.party.address = Some(address);
        self
    }

    /// Legal registration id with its scheme (e.g. SIRENE "0002", Malaysian "BRN").
    pub fn legal_id(mut self, value: impl Into<String>, scheme: impl Into<String>) -> Self {
        self.party.legal_id = Some(Identifier::with_scheme(value, scheme));
        self
    }

    pub fn id(mut self, id: Identifier) -> Self {
        self.party.id = Some(id);
        self
    }

    pub fn identifier(mut self, value: impl Into<String>, scheme: impl Into<String>) -> Self {
        self.party.identifiers.push(Identifier::with_scheme(value, scheme));
        self
    }

    pub fn vat_id(mut self, id: impl Into<String>) -> Self {
        self.party.tax_registrations.push(Identifier::with_scheme(id, "VA"));
        self
    }

    pub fn tax_number(mut self, num: impl Into<String>) -> Self {
        self.party.tax_registrations.push(Identifier::with_scheme(num, "FC"));
        self
    }

    pub fn trading_name(mut self, name: impl Into<String>) -> Self {
        self.party.trading_name = Some(name.into());
        self
    }

    pub fn contact(mut self, contact: Contact) -> Self {
        self.party.contact = Some(contact);
        self
    }

    pub fn electronic_address(
        mut self,
        scheme: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.party.electronic_address = Some(Identifier::with_scheme(value, scheme));
        self
    }

    pub fn build(self) -> Party {
        self.party
    }
}

/// Builder for [`Address`].
pub struct AddressBuilder {
    address: Address,
}

impl AddressBuilder {
    pub fn new(
        city: impl Into<String>,
        postal_code: impl Into<String>,
        country_code: impl Into<String>,
    ) -> Self {
        let mut builder = Self::country(country_code);
        builder.address.city = Some(city.into());
        builder.address.postal_code = Some(postal_code.into());
        builder
    }

    /// An address with only a country code.
    pub fn country(country_code: impl Into<String>) -> Self {
        Self {
            address: Address {
                line_one: None,
                line_two: None,
                line_three: None,
                postal_code: None,
                city: None,
                country_code: country_code.into(),
                subdivision: None,
            },
        }
    }

    pub fn street(mut self, street: impl Into<String>) -> Self {
        self.address.line_one = Some(street.into());
        self
    }

    pub fn additional(mut self, additional: impl Into<String>) -> Self {
        self.address.line_two = Some(additional.into());
        self
    }

    pub fn line_three(mut self, line: impl Into<String>) -> Self {
        self.address.line_three = Some(line.into());
        self
    }

    pub fn subdivision(mut self, subdivision: impl Into<String>) -> Self {
        self.address.subdivision = Some(subdivision.into());
        self
    }

    pub fn build(self) -> Address {
        self.address
    }
}

/// Builder for [`LineItem`]. The tax rate defaults to zero.
pub struct LineItemBuilder {
    line: LineItem,
}

impl LineItemBuilder {
    pub fn new(
        name: impl Into<String>,
        quantity: Decimal,
        unit: impl Into<String>,
        unit_price: Decimal,
    ) -> Self {
        Self {
            line: LineItem {
                name: name.into(),
                description: None,
                unit_price,
                gross_price: None,
                quantity,
                unit: unit.into(),
                tax_rate: Decimal::ZERO,
                global_id: None,
            },
        }
    }

    pub fn tax_rate(mut self, rate: Decimal) -> Self {
        self.line.tax_rate = rate;
        self
    }

    pub fn gross_price(mut self, price: Decimal) -> Self {
        self.line.gross_price = Some(price);
        self
    }

    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.line.description = Some(desc.into());
        self
    }

    /// Global item id under the GTIN scheme.
    pub fn global_id(self, id: impl Into<String>) -> Self {
        self.global_id_with_scheme(id, schemes::GTIN)
    }

    pub fn global_id_with_scheme(
        mut self,
        id: impl Into<String>,
        scheme: impl Into<String>,
    ) -> Self {
        self.line.global_id = Some(Identifier::with_scheme(id, scheme));
        self
    }

    pub fn build(self) -> LineItem {
        self.line
    }
}
