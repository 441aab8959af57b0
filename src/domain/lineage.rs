//! Parentage helpers that work on already-loaded animals.
use super::animal::{is_on_the_farm, Animal};
use super::farm::Farm;
use crate::constants::LITTER_TOLERANCE_HOURS;
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use uuid::Uuid;

/// Representative birth instant -> progeny born within the tolerance window.
pub type Litters = BTreeMap<NaiveDateTime, Vec<Animal>>;

/// Which animals a lineage query may return.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineageScope {
    /// Only animals owned by an active farm and still alive.
    OnTheFarm,
    /// Everything ever recorded.
    #[default]
    Historical,
}

/// Which parent slot a child table is built from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChildTableSwitch {
    Dam,
    Sire,
    #[default]
    All,
}

impl LineageScope {
    /// `farms` maps farm ids to farm records; only owners are looked up.
    pub fn admits(&self, animal: &Animal, farms: &HashMap<Uuid, Farm>) -> bool {
        match self {
            LineageScope::Historical => true,
            LineageScope::OnTheFarm => {
                let owner = animal
                    .owner
                    .as_ref()
                    .and_then(|o| o.farm_id())
                    .and_then(|id| farms.get(&id));
                is_on_the_farm(animal, owner)
            }
        }
    }
}

fn within_tolerance(a: NaiveDateTime, b: NaiveDateTime) -> bool {
    let diff = if a > b { a - b } else { b - a };
    diff < Duration::hours(LITTER_TOLERANCE_HOURS)
}

/// Group progeny into litters by birth instant.
///
/// Progeny are visited in the order given. A birth instant becomes a new
/// representative unless it is strictly within the tolerance of one already
/// recorded. Each representative then collects every progeny inside its open
/// window, so an animal close to two representatives shows up in both.
/// Progeny without a birthday are skipped.
pub fn group_litters(progeny: &[Animal]) -> Litters {
    let mut representatives: Vec<NaiveDateTime> = Vec::new();
    for born in progeny.iter().filter_map(Animal::born_at) {
        if !representatives.iter().any(|rep| within_tolerance(*rep, born)) {
            representatives.push(born);
        }
    }

    representatives
        .into_iter()
        .map(|rep| {
            let members = progeny
                .iter()
                .filter(|p| p.born_at().is_some_and(|born| within_tolerance(rep, born)))
                .cloned()
                .collect();
            (rep, members)
        })
        .collect()
}

/// Animals recorded with `parent` as sire.
pub fn sire_of<'a>(parent: Uuid, animals: &'a [Animal]) -> Vec<&'a Animal> {
    animals.iter().filter(|a| a.sire_id == Some(parent)).collect()
}

/// Animals recorded with `parent` as dam.
pub fn dam_of<'a>(parent: Uuid, animals: &'a [Animal]) -> Vec<&'a Animal> {
    animals.iter().filter(|a| a.dam_id == Some(parent)).collect()
}

/// Animals with `parent` in either parent slot.
pub fn progeny_of<'a>(parent: Uuid, animals: &'a [Animal]) -> Vec<&'a Animal> {
    animals
        .iter()
        .filter(|a| a.sire_id == Some(parent) || a.dam_id == Some(parent))
        .collect()
}

/// Ancestor tree of an animal, cut off at a fixed depth.
#[derive(Debug, Clone, Serialize)]
pub struct Pedigree {
    pub animal_id: Uuid,
    pub name: Option<String>,
    pub dam: Option<Box<Pedigree>>,
    pub sire: Option<Box<Pedigree>>,
}

/// Build a pedigree from an id-indexed herd. Ancestors already on the
/// current path are not revisited, so recorded cycles terminate.
pub fn pedigree(root: &Animal, herd: &HashMap<Uuid, Animal>, depth: usize) -> Pedigree {
    let mut path = HashSet::new();
    build_pedigree(root, herd, depth, &mut path)
}

fn build_pedigree(
    animal: &Animal,
    herd: &HashMap<Uuid, Animal>,
    depth: usize,
    path: &mut HashSet<Uuid>,
) -> Pedigree {
    path.insert(animal.id);
    let parent = |id: Option<Uuid>, path: &mut HashSet<Uuid>| {
        if depth == 0 {
            return None;
        }
        let parent = herd.get(&id?)?;
        if path.contains(&parent.id) {
            return None;
        }
        Some(Box::new(build_pedigree(parent, herd, depth - 1, path)))
    };
    let dam = parent(animal.dam_id, path);
    let sire = parent(animal.sire_id, path);
    path.remove(&animal.id);

    Pedigree {
        animal_id: animal.id,
        name: animal.name.clone(),
        dam,
        sire,
    }
}

/// Find parentage cycles (an animal that is its own ancestor). Each cycle is
/// reported once, as the ids along it starting from its smallest id.
pub fn parentage_cycles(herd: &HashMap<Uuid, Animal>) -> Vec<Vec<Uuid>> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        Visiting,
        Done,
    }

    fn visit(
        id: Uuid,
        herd: &HashMap<Uuid, Animal>,
        marks: &mut HashMap<Uuid, Mark>,
        stack: &mut Vec<Uuid>,
        cycles: &mut Vec<Vec<Uuid>>,
    ) {
        match marks.get(&id) {
            Some(Mark::Done) => return,
            Some(Mark::Visiting) => {
                if let Some(start) = stack.iter().position(|s| *s == id) {
                    let mut cycle = stack[start..].to_vec();
                    let min_pos = cycle
                        .iter()
                        .enumerate()
                        .min_by_key(|(_, id)| **id)
                        .map(|(i, _)| i);
                    if let Some(min_pos) = min_pos {
                        cycle.rotate_left(min_pos);
                    }
                    if !cycles.contains(&cycle) {
                        cycles.push(cycle);
                    }
                }
                return;
            }
            None => {}
        }

        let Some(animal) = herd.get(&id) else {
            return;
        };
        marks.insert(id, Mark::Visiting);
        stack.push(id);
        for parent in [animal.dam_id, animal.sire_id].into_iter().flatten() {
            visit(parent, herd, marks, stack, cycles);
        }
        stack.pop();
        marks.insert(id, Mark::Done);
    }

    let mut ids: Vec<Uuid> = herd.keys().copied().collect();
    ids.sort();

    let mut marks = HashMap::new();
    let mut stack = Vec::new();
    let mut cycles = Vec::new();
    for id in ids {
        visit(id, herd, &mut marks, &mut stack, &mut cycles);
    }
    cycles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::animal::Sex;
    use chrono::NaiveDate;

    fn kid_born(at: NaiveDateTime) -> Animal {
        let mut kid = Animal::new(Uuid::new_v4(), Sex::Female).born(at.date());
        kid.birthtime = Some(at.time());
        kid
    }

    fn day(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 4, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_half_day_apart_is_one_litter() {
        let first = kid_born(day(10));
        let second = kid_born(day(10) + Duration::hours(12));
        let litters = group_litters(&[first.clone(), second.clone()]);

        assert_eq!(litters.len(), 1);
        let members = &litters[&day(10)];
        let ids: Vec<Uuid> = members.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
    }

    #[test]
    fn test_exactly_one_day_apart_is_two_litters() {
        let first = kid_born(day(10));
        let second = kid_born(day(11));
        let litters = group_litters(&[first.clone(), second.clone()]);

        assert_eq!(litters.len(), 2);
        assert_eq!(litters[&day(10)].len(), 1);
        assert_eq!(litters[&day(10)][0].id, first.id);
        assert_eq!(litters[&day(11)][0].id, second.id);
    }

    #[test]
    fn test_members_are_everything_inside_the_open_window() {
        // 10th 00:00 is the first representative; 11th 00:00 is exactly one
        // day away so it starts its own litter; 10th 18:00 sits inside both
        // windows and is listed under each.
        let a = kid_born(day(10));
        let b = kid_born(day(11));
        let c = kid_born(day(10) + Duration::hours(18));
        let litters = group_litters(&[a.clone(), b.clone(), c.clone()]);

        assert_eq!(litters.len(), 2);
        let first: Vec<Uuid> = litters[&day(10)].iter().map(|x| x.id).collect();
        let second: Vec<Uuid> = litters[&day(11)].iter().map(|x| x.id).collect();
        assert_eq!(first, vec![a.id, c.id]);
        assert_eq!(second, vec![b.id, c.id]);
    }

    #[test]
    fn test_progeny_without_birthday_are_skipped() {
        let unknown = Animal::new(Uuid::new_v4(), Sex::Male);
        assert!(group_litters(&[unknown]).is_empty());
    }

    #[test]
    fn test_progeny_queries() {
        let parent = Animal::new(Uuid::new_v4(), Sex::Female);
        let mut b = Animal::new(Uuid::new_v4(), Sex::Male);
        b.sire_id = Some(parent.id);
        let mut c = Animal::new(Uuid::new_v4(), Sex::Female);
        c.dam_id = Some(parent.id);
        let unrelated = Animal::new(Uuid::new_v4(), Sex::Female);
        let herd = vec![parent.clone(), b.clone(), c.clone(), unrelated];

        let progeny: Vec<Uuid> = progeny_of(parent.id, &herd).iter().map(|a| a.id).collect();
        assert_eq!(progeny, vec![b.id, c.id]);
        let sired: Vec<Uuid> = sire_of(parent.id, &herd).iter().map(|a| a.id).collect();
        assert_eq!(sired, vec![b.id]);
        let dammed: Vec<Uuid> = dam_of(parent.id, &herd).iter().map(|a| a.id).collect();
        assert_eq!(dammed, vec![c.id]);
    }

    #[test]
    fn test_pedigree_and_cycles() {
        let grand_dam = Animal::new(Uuid::new_v4(), Sex::Female).named("Granny");
        let mut dam = Animal::new(Uuid::new_v4(), Sex::Female).named("Mama");
        dam.dam_id = Some(grand_dam.id);
        let mut kid = Animal::new(Uuid::new_v4(), Sex::Male).named("Billy");
        kid.dam_id = Some(dam.id);

        let mut herd: HashMap<Uuid, Animal> = [grand_dam.clone(), dam.clone(), kid.clone()]
            .into_iter()
            .map(|a| (a.id, a))
            .collect();

        let tree = pedigree(&kid, &herd, 3);
        let dam_node = tree.dam.as_ref().unwrap();
        assert_eq!(dam_node.animal_id, dam.id);
        assert_eq!(dam_node.dam.as_ref().unwrap().animal_id, grand_dam.id);
        assert!(tree.sire.is_none());

        let shallow = pedigree(&kid, &herd, 1);
        assert!(shallow.dam.as_ref().unwrap().dam.is_none());

        assert!(parentage_cycles(&herd).is_empty());

        // Granny recorded as Billy's daughter closes a loop.
        herd.get_mut(&grand_dam.id).unwrap().dam_id = Some(kid.id);
        let cycles = parentage_cycles(&herd);
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].len(), 3);

        let looped = pedigree(&kid, &herd, 10);
        let granny = looped.dam.unwrap().dam.unwrap();
        assert!(granny.dam.is_none());
    }
}
