//! People and address search queries.
//!
//! Result pages receive their query as one URL path segment made of
//! underscore-joined positional fields, e.g. `Jane_Doe_Austin_TX` or
//! `1 Main St_Austin_TX_78701`. The segment is percent-encoded as a whole.

use crate::error::QueryError;
use serde::{Deserialize, Serialize};

/// Fields may not contain the segment separator.
fn sanitize(field: &str) -> String {
    field.trim().replace('_', " ")
}

fn join_segment(parts: &[&str]) -> String {
    urlencoding::encode(&parts.join("_")).into_owned()
}

fn split_segment(segment: &str) -> Result<Vec<String>, QueryError> {
    let decoded =
        urlencoding::decode(segment).map_err(|e| QueryError::BadSegment(e.to_string()))?;
    Ok(decoded.split('_').map(str::to_string).collect())
}

fn push_param(params: &mut Vec<String>, key: &str, value: &str) {
    params.push(format!("{}={}", key, urlencoding::encode(value)));
}

/// A people (or background check) search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeopleQuery {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
}

impl PeopleQuery {
    /// Build a query from form input.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::MissingName` when both names are blank.
    pub fn new(
        first_name: &str,
        last_name: &str,
        city: Option<&str>,
        state: Option<&str>,
    ) -> Result<Self, QueryError> {
        if first_name.trim().is_empty() && last_name.trim().is_empty() {
            return Err(QueryError::MissingName);
        }

        Ok(Self {
            first_name: sanitize(first_name),
            last_name: sanitize(last_name),
            city: city.map(sanitize).unwrap_or_default(),
            state: state.map(sanitize).unwrap_or_default(),
        })
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Encode as `first_last[_city[_state]]`.
    ///
    /// # Example
    ///
    /// ```
    /// use people_lookup_mcp::domain::PeopleQuery;
    ///
    /// let query = PeopleQuery::new("Jane", "Doe", None, Some("TX")).unwrap();
    /// assert_eq!(query.to_path_segment(), "Jane_Doe__TX");
    /// ```
    pub fn to_path_segment(&self) -> String {
        let mut parts = vec![self.first_name.as_str(), self.last_name.as_str()];
        if !self.state.is_empty() {
            parts.push(&self.city);
            parts.push(&self.state);
        } else if !self.city.is_empty() {
            parts.push(&self.city);
        }
        join_segment(&parts)
    }

    /// Decode a path segment. Fewer than two parts leaves every field empty.
    pub fn from_path_segment(segment: &str) -> Result<Self, QueryError> {
        let parts = split_segment(segment)?;
        if parts.len() < 2 {
            return Ok(Self::default());
        }

        let field = |i: usize| parts.get(i).cloned().unwrap_or_default();
        Ok(Self {
            first_name: field(0),
            last_name: field(1),
            city: field(2),
            state: field(3),
        })
    }

    /// Query string for `/api/search/people/`. City and state are omitted when empty.
    pub fn to_query_params(&self) -> String {
        let mut params = Vec::with_capacity(4);
        push_param(&mut params, "first_name", &self.first_name);
        push_param(&mut params, "last_name", &self.last_name);
        if !self.city.is_empty() {
            push_param(&mut params, "city", &self.city);
        }
        if !self.state.is_empty() {
            push_param(&mut params, "state", &self.state);
        }
        params.join("&")
    }
}

/// A property/address search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressQuery {
    pub street: String,
    pub city: String,
    pub state: String,
    #[serde(default)]
    pub zip_code: String,
}

impl AddressQuery {
    /// Build a query from form input.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::MissingAddressFields` unless street, city and
    /// state are all present.
    pub fn new(
        street: &str,
        city: &str,
        state: &str,
        zip_code: Option<&str>,
    ) -> Result<Self, QueryError> {
        if street.trim().is_empty() || city.trim().is_empty() || state.trim().is_empty() {
            return Err(QueryError::MissingAddressFields);
        }

        Ok(Self {
            street: sanitize(street),
            city: sanitize(city),
            state: sanitize(state),
            zip_code: zip_code.map(sanitize).unwrap_or_default(),
        })
    }

    /// Single-line display form.
    pub fn one_line(&self) -> String {
        let mut line = format!("{}, {}, {}", self.street, self.city, self.state);
        if !self.zip_code.is_empty() {
            line.push(' ');
            line.push_str(&self.zip_code);
        }
        line
    }

    /// Encode as `street_city_state[_zip]`.
    pub fn to_path_segment(&self) -> String {
        let mut parts = vec![self.street.as_str(), self.city.as_str(), self.state.as_str()];
        if !self.zip_code.is_empty() {
            parts.push(&self.zip_code);
        }
        join_segment(&parts)
    }

    /// Decode a path segment. Fewer than three parts leaves every field empty.
    pub fn from_path_segment(segment: &str) -> Result<Self, QueryError> {
        let parts = split_segment(segment)?;
        if parts.len() < 3 {
            return Ok(Self::default());
        }

        let field = |i: usize| parts.get(i).cloned().unwrap_or_default();
        Ok(Self {
            street: field(0),
            city: field(1),
            state: field(2),
            zip_code: field(3),
        })
    }

    /// Query string for `/api/search/address/`.
    pub fn to_query_params(&self) -> String {
        let mut params = Vec::with_capacity(4);
        push_param(&mut params, "street", &self.street);
        push_param(&mut params, "city", &self.city);
        push_param(&mut params, "state", &self.state);
        if !self.zip_code.is_empty() {
            push_param(&mut params, "zip_code", &self.zip_code);
        }
        params.join("&")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_people_query_requires_a_name() {
        assert_eq!(
            PeopleQuery::new("  ", "", None, None),
            Err(QueryError::MissingName)
        );
        let query = PeopleQuery::new("", "Doe", None, None).unwrap();
        assert_eq!(query.full_name(), "Doe");
    }

    #[test]
    fn test_people_segment() {
        let query = PeopleQuery::new(" Jane ", "Doe", Some("San Jose"), Some("CA")).unwrap();
        assert_eq!(query.to_path_segment(), "Jane_Doe_San%20Jose_CA");

        let decoded = PeopleQuery::from_path_segment("Jane_Doe_San%20Jose_CA").unwrap();
        assert_eq!(decoded, query);
    }

    #[test]
    fn test_people_segment_keeps_state_position() {
        let query = PeopleQuery::new("Jane", "Doe", None, Some("TX")).unwrap();
        let decoded = PeopleQuery::from_path_segment(&query.to_path_segment()).unwrap();
        assert_eq!(decoded.city, "");
        assert_eq!(decoded.state, "TX");
    }

    #[test]
    fn test_people_segment_too_short() {
        let decoded = PeopleQuery::from_path_segment("Jane").unwrap();
        assert_eq!(decoded, PeopleQuery::default());
    }

    #[test]
    fn test_underscore_in_field_is_replaced() {
        let query = PeopleQuery::new("Mary_Ann", "Lee", None, None).unwrap();
        assert_eq!(query.first_name, "Mary Ann");
        assert_eq!(query.to_path_segment(), "Mary%20Ann_Lee");
    }

    #[test]
    fn test_people_query_params() {
        let query = PeopleQuery::new("Jane", "O'Neil", None, Some("NY")).unwrap();
        assert_eq!(
            query.to_query_params(),
            "first_name=Jane&last_name=O%27Neil&state=NY"
        );
    }

    #[test]
    fn test_address_query_requires_fields() {
        assert_eq!(
            AddressQuery::new("1 Main St", "", "TX", None),
            Err(QueryError::MissingAddressFields)
        );
    }

    #[test]
    fn test_address_segment_and_params() {
        let query = AddressQuery::new("1 Main St", "Austin", "TX", Some("78701")).unwrap();
        assert_eq!(query.to_path_segment(), "1%20Main%20St_Austin_TX_78701");
        assert_eq!(
            query.to_query_params(),
            "street=1%20Main%20St&city=Austin&state=TX&zip_code=78701"
        );
        assert_eq!(query.one_line(), "1 Main St, Austin, TX 78701");

        let decoded = AddressQuery::from_path_segment("1%20Main%20St_Austin_TX").unwrap();
        assert_eq!(decoded.street, "1 Main St");
        assert_eq!(decoded.zip_code, "");
    }

    #[test]
    fn test_bad_segment_encoding() {
        let result = AddressQuery::from_path_segment("%FF%FE_a_b");
        assert!(matches!(result, Err(QueryError::BadSegment(_))));
    }
}
