//! Pure calendar helpers shared by the availability endpoint and the month
//! grid
//!
//! Nothing in here touches the database or keeps state between calls, the
//! current selection is passed in and a new one is handed back.

use std::collections::BTreeSet;

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// First and last day of a month, `None` if the month does not exist
#[must_use]
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
	let first = NaiveDate::from_ymd_opt(year, month, 1)?;
	let last = first.checked_add_months(Months::new(1))?.pred_opt()?;

	Some((first, last))
}

/// Collect every day of the given month covered by one of the inclusive
/// `(start, end)` spans, in ascending order and without duplicates
///
/// Spans are clamped to the month, spans that end before they start cover
/// nothing.
#[must_use]
pub fn occupied_days<I>(year: i32, month: u32, spans: I) -> Option<Vec<u32>>
where
	I: IntoIterator<Item = (NaiveDate, NaiveDate)>,
{
	let (first, last) = month_bounds(year, month)?;

	let mut days = BTreeSet::new();

	for (start, end) in spans {
		let from = start.max(first);
		let to = end.min(last);

		days.extend(
			from.iter_days().take_while(|date| *date <= to).map(|d| d.day()),
		);
	}

	Some(days.into_iter().collect())
}

/// Whether a day lies strictly before today
#[must_use]
pub fn is_past(date: NaiveDate, today: NaiveDate) -> bool { date < today }

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
	#[error("{0} lies in the past")]
	InPast(NaiveDate),
	#[error("the end date {end} lies before the start date {start}")]
	EndBeforeStart { start: NaiveDate, end: NaiveDate },
	#[error("an end date was given without a start date")]
	MissingStart,
}

/// A (possibly partial) stay range picked by a visitor
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
pub struct Selection {
	pub start: Option<NaiveDate>,
	pub end:   Option<NaiveDate>,
}

impl Selection {
	/// Build a selection from an optional start and end date
	///
	/// # Errors
	/// Fails if the end date comes without a start date or lies before it
	pub fn from_range(
		start: Option<NaiveDate>,
		end: Option<NaiveDate>,
	) -> Result<Self, SelectionError> {
		match (start, end) {
			(None, Some(_)) => Err(SelectionError::MissingStart),
			(Some(start), Some(end)) if end < start => {
				Err(SelectionError::EndBeforeStart { start, end })
			},
			_ => Ok(Self { start, end }),
		}
	}

	/// Apply a click on `date` and return the resulting selection
	///
	/// Without a start, or with a complete range, the day becomes the new
	/// start. A day on or after the start completes the range, an earlier day
	/// starts over.
	///
	/// # Errors
	/// Fails if `date` lies in the past
	pub fn select(
		self,
		date: NaiveDate,
		today: NaiveDate,
	) -> Result<Self, SelectionError> {
		if is_past(date, today) {
			return Err(SelectionError::InPast(date));
		}

		let next = match (self.start, self.end) {
			(Some(start), None) if date >= start => {
				Self { start: Some(start), end: Some(date) }
			},
			_ => Self { start: Some(date), end: None },
		};

		Ok(next)
	}

	#[must_use]
	pub fn is_complete(&self) -> bool {
		self.start.is_some() && self.end.is_some()
	}

	/// Whether `date` is the start or the end of the selection
	#[must_use]
	pub fn is_endpoint(&self, date: NaiveDate) -> bool {
		self.start == Some(date) || self.end == Some(date)
	}

	/// Whether `date` lies strictly between the start and end
	#[must_use]
	pub fn is_inside(&self, date: NaiveDate) -> bool {
		matches!(
			(self.start, self.end),
			(Some(start), Some(end)) if start < date && date < end
		)
	}
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DayState {
	Free,
	Booked,
	Past,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayCell {
	pub day:      u32,
	pub state:    DayState,
	pub selected: bool,
	pub in_range: bool,
}

impl DayCell {
	/// Only free days can be clicked
	#[must_use]
	pub fn is_selectable(&self) -> bool { self.state == DayState::Free }
}

/// A Monday-first month grid
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthGrid {
	pub year:           i32,
	pub month:          u32,
	/// Empty cells before the first day of the month
	pub leading_blanks: u32,
	pub days:           Vec<DayCell>,
}

/// Lay out a month, booked days win over past days
#[must_use]
pub fn render_month(
	year: i32,
	month: u32,
	occupied: &[u32],
	selection: &Selection,
	today: NaiveDate,
) -> Option<MonthGrid> {
	let (first, last) = month_bounds(year, month)?;

	let days = first
		.iter_days()
		.take_while(|date| *date <= last)
		.map(|date| {
			let day = date.day();

			let state = if occupied.contains(&day) {
				DayState::Booked
			} else if is_past(date, today) {
				DayState::Past
			} else {
				DayState::Free
			};

			DayCell {
				day,
				state,
				selected: selection.is_endpoint(date),
				in_range: selection.is_inside(date),
			}
		})
		.collect();

	Some(MonthGrid {
		year,
		month,
		leading_blanks: first.weekday().num_days_from_monday(),
		days,
	})
}
