use std::collections::HashSet;

use tracing::info;

use crate::model::Member;
use crate::picker::{ClickOutcome, MemberPicker};
use crate::session::{AppState, CurrentUser};
use crate::validator::{validate, Field, FieldErrors, Issue, ReservationDraft, Snapshot, ValidReservation};

/// State of the reservation form: draft fields, participant picker and the
/// errors of the last validation run.
///
/// Every edit revalidates the whole draft against the snapshot passed in.
/// Errors are only shown for fields the user has touched, until `submit`.
#[derive(Debug, Clone)]
pub struct ReservationForm {
    draft: ReservationDraft,
    picker: MemberPicker,
    errors: FieldErrors,
    touched: HashSet<Field>,
}

impl ReservationForm {
    /// The reserver, if any, starts out as a participant that cannot be removed.
    pub fn new(members: Vec<Member>, reserver: Option<&CurrentUser>) -> Self {
        let mut picker = MemberPicker::new(members);
        if let Some(user) = reserver {
            picker.pin(&user.member.id);
        }
        let draft = ReservationDraft {
            participants: picker.selected().to_vec(),
            ..ReservationDraft::default()
        };
        Self {
            draft,
            picker,
            errors: FieldErrors::new(),
            touched: HashSet::new(),
        }
    }

    /// Form for whoever is signed in to `state`.
    pub async fn for_session(members: Vec<Member>, state: &AppState) -> Self {
        let user = state.current_user().await;
        Self::new(members, user.as_ref())
    }

    pub fn draft(&self) -> &ReservationDraft {
        &self.draft
    }

    pub fn picker(&self) -> &MemberPicker {
        &self.picker
    }

    /// For open/close and search; selection goes through `click_participant`.
    pub fn picker_mut(&mut self) -> &mut MemberPicker {
        &mut self.picker
    }

    /// Every error of the last run, touched or not.
    pub fn all_errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn errors_for(&self, field: Field) -> Vec<Issue> {
        if !self.touched.contains(&field) {
            return Vec::new();
        }
        self.errors.for_field(field).collect()
    }

    pub fn set_title(&mut self, title: impl Into<String>, snapshot: &Snapshot) {
        self.draft.title = title.into();
        self.touch(Field::Title, snapshot);
    }

    pub fn set_resource(&mut self, resource_id: impl Into<String>, snapshot: &Snapshot) {
        self.draft.resource_id = resource_id.into();
        self.touch(Field::ResourceId, snapshot);
    }

    pub fn set_start_time(&mut self, start_time: impl Into<String>, snapshot: &Snapshot) {
        self.draft.start_time = start_time.into();
        self.touch(Field::StartTime, snapshot);
    }

    pub fn set_end_time(&mut self, end_time: impl Into<String>, snapshot: &Snapshot) {
        self.draft.end_time = end_time.into();
        self.touch(Field::EndTime, snapshot);
    }

    pub fn click_participant(&mut self, member_id: &str, snapshot: &Snapshot) -> ClickOutcome {
        let outcome = self.picker.click(member_id);
        if outcome != ClickOutcome::Ignored {
            self.draft.participants = self.picker.selected().to_vec();
        }
        self.touch(Field::Participants, snapshot);
        outcome
    }

    /// Validate everything and mark every field touched.
    pub fn submit(&mut self, snapshot: &Snapshot) -> Result<ValidReservation, FieldErrors> {
        self.touched.extend([
            Field::Title,
            Field::ResourceId,
            Field::StartTime,
            Field::EndTime,
            Field::Participants,
        ]);
        let result = validate(&self.draft, snapshot);
        match &result {
            Ok(valid) => {
                self.errors = FieldErrors::new();
                info!(
                    "reservation accepted: {} {}-{}",
                    valid.resource_id,
                    valid.start_time(),
                    valid.end_time()
                );
            }
            Err(errors) => {
                self.errors = errors.clone();
                info!("reservation rejected: {errors}");
            }
        }
        result
    }

    fn touch(&mut self, field: Field, snapshot: &Snapshot) {
        self.touched.insert(field);
        self.errors = validate(&self.draft, snapshot).err().unwrap_or_default();
    }
}
