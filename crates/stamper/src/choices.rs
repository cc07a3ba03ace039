//! The list of timezones offered when configuring the publisher.

use serde::Serialize;

/// One entry of the timezone list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TimezoneChoice {
	/// Text shown to the user
	pub name: String,
	/// Value submitted with the form
	pub value: String,
	pub selected: bool
}

/// Timezone identifiers sorted for display, with the configured one marked.
///
/// # Examples
///
/// ```
/// # use stamper::TimezoneChoices;
/// let choices = TimezoneChoices::build(["UTC", "Europe/Berlin", "UTC"], Some("UTC"));
/// let names: Vec<_> = choices.iter().map(|c| c.name.as_str()).collect();
/// assert_eq!(names, ["Europe/Berlin", "UTC"]);
/// assert_eq!(choices.selected().map(|c| c.value.as_str()), Some("UTC"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TimezoneChoices {
	options: Vec<TimezoneChoice>
}

impl TimezoneChoices {
	/// Sort and deduplicate `ids`, marking the entry equal to `selected`.
	///
	/// `selected` is the timezone the form was last saved with, if any. A `selected` value
	/// missing from `ids` marks nothing.
	pub fn build<I, S>(ids: I, selected: Option<&str>) -> TimezoneChoices
	where
		I: IntoIterator<Item = S>,
		S: Into<String>
	{
		let mut ids: Vec<String> = ids.into_iter().map(Into::into).collect();
		ids.sort_unstable();
		ids.dedup();

		let options = ids.into_iter()
			.map(|id| TimezoneChoice {
				selected: selected == Some(id.as_str()),
				name: id.clone(),
				value: id
			})
			.collect();
		TimezoneChoices { options }
	}

	pub fn options(&self) -> &[TimezoneChoice] {
		&self.options
	}

	/// The selected entry, if any.
	pub fn selected(&self) -> Option<&TimezoneChoice> {
		self.options.iter().find(|c| c.selected)
	}

	pub fn iter(&self) -> std::slice::Iter<'_, TimezoneChoice> {
		self.options.iter()
	}

	pub fn len(&self) -> usize {
		self.options.len()
	}

	pub fn is_empty(&self) -> bool {
		self.options.is_empty()
	}
}

impl<'a> IntoIterator for &'a TimezoneChoices {
	type Item = &'a TimezoneChoice;
	type IntoIter = std::slice::Iter<'a, TimezoneChoice>;

	fn into_iter(self) -> Self::IntoIter {
		self.options.iter()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn sorted_and_selected() {
		let ids = ["UTC", "America/New_York", "Asia/Kolkata", "America/Chicago"];
		let choices = TimezoneChoices::build(ids, Some("Asia/Kolkata"));

		let values: Vec<_> = choices.iter().map(|c| c.value.as_str()).collect();
		assert_eq!(values, ["America/Chicago", "America/New_York", "Asia/Kolkata", "UTC"]);
		assert!(choices.iter().all(|c| c.name == c.value));

		let selected: Vec<_> = choices.iter().filter(|c| c.selected).collect();
		assert_eq!(selected.len(), 1);
		assert_eq!(selected[0].value, "Asia/Kolkata");
	}

	#[test]
	fn nothing_selected() {
		let choices = TimezoneChoices::build(["UTC", "GMT"], None);
		assert_eq!(choices.selected(), None);
		assert_eq!(choices.len(), 2);

		let choices = TimezoneChoices::build(["UTC", "GMT"], Some("Europe/Paris"));
		assert_eq!(choices.selected(), None);

		let choices = TimezoneChoices::build(Vec::<String>::new(), Some("UTC"));
		assert!(choices.is_empty());
	}

	#[test]
	fn duplicates() {
		let choices = TimezoneChoices::build(["UTC", "UTC", "GMT", "UTC"], Some("UTC"));
		assert_eq!(choices.len(), 2);
		assert_eq!(choices.options()[1], TimezoneChoice {
			name: String::from("UTC"),
			value: String::from("UTC"),
			selected: true
		});
	}

	#[test]
	fn serialize() {
		let choices = TimezoneChoices::build(["UTC"], Some("UTC"));
		assert_eq!(
			serde_json::to_string(&choices).unwrap(),
			r#"{"options":[{"name":"UTC","value":"UTC","selected":true}]}"#
		);
	}
}
