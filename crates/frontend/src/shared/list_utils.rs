//! Searching, sorting and paging of in-memory lists.
use std::cmp::Ordering;

use contracts::domain::a001_booking::Booking;
use contracts::domain::a002_discount::Discount;
use contracts::domain::a003_review::Review;
use contracts::domain::a004_room::Room;
use contracts::system::users::User;

/// Types that can be matched against a free-text filter.
pub trait Searchable {
    fn matches_filter(&self, filter: &str) -> bool;
}

/// Types that can be ordered by a named column.
pub trait Sortable {
    fn compare_by_field(&self, other: &Self, field: &str) -> Ordering;
}

pub fn sort_list<T: Sortable>(items: &mut [T], field: &str, ascending: bool) {
    items.sort_by(|a, b| {
        let cmp = a.compare_by_field(b, field);
        if ascending {
            cmp
        } else {
            cmp.reverse()
        }
    });
}

/// Items matching `filter`; a blank filter keeps everything.
pub fn filter_list<T: Searchable + Clone>(items: &[T], filter: &str) -> Vec<T> {
    if filter.trim().is_empty() {
        return items.to_vec();
    }
    items
        .iter()
        .filter(|item| item.matches_filter(filter))
        .cloned()
        .collect()
}

pub fn get_sort_indicator(current_field: &str, field: &str, ascending: bool) -> &'static str {
    if current_field == field {
        if ascending {
            " ▲"
        } else {
            " ▼"
        }
    } else {
        " ⇅"
    }
}

pub fn get_sort_class(current_field: &str, field: &str) -> &'static str {
    if current_field == field {
        "table__sort-indicator table__sort-indicator--active"
    } else {
        "table__sort-indicator"
    }
}

/// Number of pages for `total` items; never zero.
pub fn total_pages(total: usize, page_size: usize) -> usize {
    if total == 0 || page_size == 0 {
        1
    } else {
        total.div_ceil(page_size)
    }
}

/// The items of page `page` (0-based), clamped to the last page.
pub fn page_slice<T: Clone>(items: &[T], page: usize, page_size: usize) -> (usize, Vec<T>) {
    let pages = total_pages(items.len(), page_size);
    let page = page.min(pages - 1);
    let start = page * page_size;
    let end = (start + page_size).min(items.len());
    (page, items.get(start..end).unwrap_or(&[]).to_vec())
}

fn cmp_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

impl Sortable for Booking {
    fn compare_by_field(&self, other: &Self, field: &str) -> Ordering {
        match field {
            "full_name" => cmp_text(&self.full_name, &other.full_name),
            "check_in_date" => self.check_in_date.cmp(&other.check_in_date),
            "check_out_date" => self.check_out_date.cmp(&other.check_out_date),
            "status" => self.status.code().cmp(other.status.code()),
            "final_price" => cmp_f64(self.final_price, other.final_price),
            "created_at" => self.created_at.cmp(&other.created_at),
            _ => self.id.cmp(&other.id),
        }
    }
}

impl Searchable for Booking {
    fn matches_filter(&self, filter: &str) -> bool {
        let needle = filter.trim().to_lowercase();
        self.id.to_string().contains(&needle)
            || self.full_name.to_lowercase().contains(&needle)
            || self.phone.contains(&needle)
            || self.email.to_lowercase().contains(&needle)
            || self.rooms_display().to_lowercase().contains(&needle)
    }
}

impl Sortable for Discount {
    fn compare_by_field(&self, other: &Self, field: &str) -> Ordering {
        match field {
            "code" => cmp_text(&self.code, &other.code),
            "discount_value" => cmp_f64(self.discount_value, other.discount_value),
            "valid_from" => self.valid_from.cmp(&other.valid_from),
            "valid_to" => self.valid_to.cmp(&other.valid_to),
            "used_count" => self.used_count.cmp(&other.used_count),
            _ => self.id.cmp(&other.id),
        }
    }
}

impl Searchable for Discount {
    fn matches_filter(&self, filter: &str) -> bool {
        self.code
            .to_lowercase()
            .contains(&filter.trim().to_lowercase())
    }
}

impl Sortable for Review {
    fn compare_by_field(&self, other: &Self, field: &str) -> Ordering {
        match field {
            "guest_name" => cmp_text(&self.guest_display_name(), &other.guest_display_name()),
            "rating" => cmp_f64(self.rating, other.rating),
            "status" => self.status.code().cmp(other.status.code()),
            "created_at" => self.created_at.cmp(&other.created_at),
            _ => self.id.cmp(&other.id),
        }
    }
}

impl Searchable for Review {
    fn matches_filter(&self, filter: &str) -> bool {
        self.matches(filter)
    }
}

impl Sortable for Room {
    fn compare_by_field(&self, other: &Self, field: &str) -> Ordering {
        match field {
            "room_number" => cmp_text(&self.room_number, &other.room_number),
            "room_type" => cmp_text(&self.room_type, &other.room_type),
            "price_per_night" => cmp_f64(self.price_per_night, other.price_per_night),
            "max_occupancy" => self.max_occupancy.cmp(&other.max_occupancy),
            _ => self.id.cmp(&other.id),
        }
    }
}

impl Searchable for Room {
    fn matches_filter(&self, filter: &str) -> bool {
        let needle = filter.trim().to_lowercase();
        self.room_number.to_lowercase().contains(&needle)
            || self.name.to_lowercase().contains(&needle)
            || self.room_type.to_lowercase().contains(&needle)
    }
}

impl Sortable for User {
    fn compare_by_field(&self, other: &Self, field: &str) -> Ordering {
        match field {
            "username" => cmp_text(&self.username, &other.username),
            "full_name" => cmp_text(&self.display_name(), &other.display_name()),
            "email" => cmp_text(&self.email, &other.email),
            "role" => self.role.code().cmp(other.role.code()),
            "created_at" => self.created_at.cmp(&other.created_at),
            _ => self.id.cmp(&other.id),
        }
    }
}

impl Searchable for User {
    fn matches_filter(&self, filter: &str) -> bool {
        self.matches(filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Row(&'static str, i32);

    impl Sortable for Row {
        fn compare_by_field(&self, other: &Self, field: &str) -> Ordering {
            match field {
                "name" => cmp_text(self.0, other.0),
                _ => self.1.cmp(&other.1),
            }
        }
    }

    impl Searchable for Row {
        fn matches_filter(&self, filter: &str) -> bool {
            self.0.contains(filter.trim())
        }
    }

    #[test]
    fn test_sort_both_directions() {
        let mut rows = vec![Row("b", 2), Row("C", 1), Row("a", 3)];
        sort_list(&mut rows, "name", true);
        assert_eq!(rows[0], Row("a", 3));
        sort_list(&mut rows, "value", false);
        assert_eq!(rows[0], Row("a", 3));
        assert_eq!(rows[2], Row("C", 1));
    }

    #[test]
    fn test_filter_blank_keeps_all() {
        let rows = vec![Row("alpha", 1), Row("beta", 2)];
        assert_eq!(filter_list(&rows, "  ").len(), 2);
        assert_eq!(filter_list(&rows, "alp"), vec![Row("alpha", 1)]);
    }

    #[test]
    fn test_paging() {
        let items: Vec<i32> = (1..=23).collect();
        assert_eq!(total_pages(23, 10), 3);
        assert_eq!(total_pages(0, 10), 1);
        let (page, slice) = page_slice(&items, 2, 10);
        assert_eq!(page, 2);
        assert_eq!(slice, vec![21, 22, 23]);
        // past the end clamps to the last page
        let (page, slice) = page_slice(&items, 9, 10);
        assert_eq!(page, 2);
        assert_eq!(slice.len(), 3);
        let (page, slice) = page_slice::<i32>(&[], 4, 10);
        assert_eq!(page, 0);
        assert!(slice.is_empty());
    }

    #[test]
    fn test_sort_indicator() {
        assert_eq!(get_sort_indicator("code", "code", true), " ▲");
        assert_eq!(get_sort_indicator("code", "code", false), " ▼");
        assert_eq!(get_sort_indicator("code", "valid_to", true), " ⇅");
    }
}
