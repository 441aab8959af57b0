//! Absolute paths of records on the HTTP surface. Kept in one place so the
//! router in [`crate::server`] and the links it hands out agree.
use crate::constants::{ANIMALS_SEGMENT, BUILDINGS_SEGMENT, FIELDS_SEGMENT, PRODUCTS_SEGMENT};
use crate::domain::{Animal, Breed, Building, Field, Genus, Product, ProductType};

pub fn genus_url(genus: &Genus) -> String {
    format!("/{}/{}", ANIMALS_SEGMENT, genus.info.slug)
}

pub fn breed_url(breed: &Breed, genus: &Genus) -> String {
    format!("{}/{}", genus_url(genus), breed.info.slug)
}

pub fn animal_url(animal: &Animal, breed: &Breed, genus: &Genus) -> String {
    format!("{}/{}", breed_url(breed, genus), animal.path_key())
}

pub fn product_type_url(product_type: &ProductType) -> String {
    format!("/{}/{}", PRODUCTS_SEGMENT, product_type.info.slug)
}

pub fn product_url(product: &Product, product_type: &ProductType) -> String {
    format!("{}/{}", product_type_url(product_type), product.info.slug)
}

pub fn building_url(building: &Building) -> String {
    format!("/{}/{}", BUILDINGS_SEGMENT, building.info.slug)
}

pub fn field_url(field: &Field) -> String {
    format!("/{}/{}", FIELDS_SEGMENT, field.info.slug)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Sex;

    #[test]
    fn test_animal_url_nests_under_breed_and_genus() {
        let goat = Genus::new("Goat");
        let nubian = Breed::new("Nubian", goat.id);
        let named = Animal::new(nubian.id, Sex::Female).named("Clover");
        assert_eq!(animal_url(&named, &nubian, &goat), "/animals/goat/nubian/clover");

        let unnamed = Animal::new(nubian.id, Sex::Male);
        let url = animal_url(&unnamed, &nubian, &goat);
        assert!(url.ends_with(&unnamed.id.simple().to_string()));
    }

    #[test]
    fn test_product_url() {
        let soap = ProductType::new("Soap");
        let bar = Product::new("Lavender Bar", soap.id);
        assert_eq!(product_url(&bar, &soap), "/products/soap/lavender-bar");
    }
}
