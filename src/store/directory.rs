/*
`Store` methods for the directory: students, teachers, and admins.

Each role keeps its own table and its own email namespace; a duplicate
email within one table is a `DuplicateEmail` error, while the same address
may appear under different roles.
*/
use tokio_postgres::{Row, Transaction};

use super::Store;
use crate::error::Error;
use crate::user::{Admin, Language, Plan, Student, Teacher, Track};

fn student_from_row(row: &Row) -> Result<Student, Error> {
    let plan_str: &str = row.try_get("plan")?;
    Ok(Student {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        plan: plan_str.parse()?,
    })
}

fn teacher_from_row(row: &Row) -> Result<Teacher, Error> {
    let language_str: &str = row.try_get("language")?;
    let track_str: &str = row.try_get("track")?;
    Ok(Teacher {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        language: language_str.parse()?,
        track: track_str.parse()?,
    })
}

fn admin_from_row(row: &Row) -> Result<Admin, Error> {
    Ok(Admin {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
    })
}

/// Is `email` already taken within the role table `table`, other than by
/// row `excluding` (pass 0 when inserting)?
///
/// This runs inside the caller's transaction so the answer still holds
/// when the subsequent insert or update commits.
async fn email_in_use(
    t: &Transaction<'_>,
    table: &str,
    email: &str,
    excluding: i64,
) -> Result<bool, Error> {
    log::trace!(
        "email_in_use( T, {:?}, {:?}, {} ) called.",
        table, email, excluding
    );

    let query = format!(
        "SELECT id FROM {} WHERE email = $1 AND id <> $2",
        table
    );
    let row = t.query_opt(query.as_str(), &[&email, &excluding]).await
        .map_err(|e| Error::from(e)
            .annotate("Error querying for preexisting email"))?;

    Ok(row.is_some())
}

impl Store {
    pub async fn insert_student(
        &self,
        name: &str,
        email: &str,
        plan: Plan,
    ) -> Result<Student, Error> {
        log::trace!(
            "Store::insert_student( {:?}, {:?}, {} ) called.",
            name, email, plan
        );

        let mut client = self.connect().await?;
        let t = client.transaction().await?;

        if email_in_use(&t, "students", email, 0).await? {
            return Err(Error::DuplicateEmail(email.to_owned()));
        }

        let row = t.query_one(
            "INSERT INTO students (name, email, plan)
                VALUES ($1, $2, $3) RETURNING *",
            &[&name, &email, &plan.to_string()]
        ).await?;
        let s = student_from_row(&row)?;

        t.commit().await?;
        log::trace!("Inserted Student {} ({}).", s.id, email);
        Ok(s)
    }

    pub async fn insert_teacher(
        &self,
        name: &str,
        email: &str,
        language: Language,
        track: Track,
    ) -> Result<Teacher, Error> {
        log::trace!(
            "Store::insert_teacher( {:?}, {:?}, {}, {} ) called.",
            name, email, language, track
        );

        let mut client = self.connect().await?;
        let t = client.transaction().await?;

        if email_in_use(&t, "teachers", email, 0).await? {
            return Err(Error::DuplicateEmail(email.to_owned()));
        }

        let row = t.query_one(
            "INSERT INTO teachers (name, email, language, track)
                VALUES ($1, $2, $3, $4) RETURNING *",
            &[&name, &email, &language.to_string(), &track.to_string()]
        ).await?;
        let teacher = teacher_from_row(&row)?;

        t.commit().await?;
        log::trace!("Inserted Teacher {} ({}).", teacher.id, email);
        Ok(teacher)
    }

    pub async fn insert_admin(
        &self,
        name: &str,
        email: &str,
    ) -> Result<Admin, Error> {
        log::trace!("Store::insert_admin( {:?}, {:?} ) called.", name, email);

        let mut client = self.connect().await?;
        let t = client.transaction().await?;

        if email_in_use(&t, "admins", email, 0).await? {
            return Err(Error::DuplicateEmail(email.to_owned()));
        }

        let row = t.query_one(
            "INSERT INTO admins (name, email)
                VALUES ($1, $2) RETURNING *",
            &[&name, &email]
        ).await?;
        let a = admin_from_row(&row)?;

        t.commit().await?;
        log::trace!("Inserted Admin {} ({}).", a.id, email);
        Ok(a)
    }

    pub async fn get_students(&self) -> Result<Vec<Student>, Error> {
        log::trace!("Store::get_students() called.");

        let client = self.connect().await?;
        let rows = client.query(
            "SELECT * FROM students ORDER BY id", &[]
        ).await?;

        let mut students: Vec<Student> = Vec::with_capacity(rows.len());
        for row in rows.iter() {
            students.push(student_from_row(row)?);
        }

        Ok(students)
    }

    /// All teachers in directory order; the matching engine filters these.
    pub async fn get_teachers(&self) -> Result<Vec<Teacher>, Error> {
        log::trace!("Store::get_teachers() called.");

        let client = self.connect().await?;
        let rows = client.query(
            "SELECT * FROM teachers ORDER BY id", &[]
        ).await?;

        let mut teachers: Vec<Teacher> = Vec::with_capacity(rows.len());
        for row in rows.iter() {
            teachers.push(teacher_from_row(row)?);
        }

        Ok(teachers)
    }

    pub async fn get_admins(&self) -> Result<Vec<Admin>, Error> {
        log::trace!("Store::get_admins() called.");

        let client = self.connect().await?;
        let rows = client.query(
            "SELECT * FROM admins ORDER BY id", &[]
        ).await?;

        let mut admins: Vec<Admin> = Vec::with_capacity(rows.len());
        for row in rows.iter() {
            admins.push(admin_from_row(row)?);
        }

        Ok(admins)
    }

    pub async fn get_student(&self, id: i64) -> Result<Option<Student>, Error> {
        log::trace!("Store::get_student( {} ) called.", id);

        let client = self.connect().await?;
        match client.query_opt(
            "SELECT * FROM students WHERE id = $1", &[&id]
        ).await? {
            Some(row) => Ok(Some(student_from_row(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn get_teacher(&self, id: i64) -> Result<Option<Teacher>, Error> {
        log::trace!("Store::get_teacher( {} ) called.", id);

        let client = self.connect().await?;
        match client.query_opt(
            "SELECT * FROM teachers WHERE id = $1", &[&id]
        ).await? {
            Some(row) => Ok(Some(teacher_from_row(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn get_admin(&self, id: i64) -> Result<Option<Admin>, Error> {
        log::trace!("Store::get_admin( {} ) called.", id);

        let client = self.connect().await?;
        match client.query_opt(
            "SELECT * FROM admins WHERE id = $1", &[&id]
        ).await? {
            Some(row) => Ok(Some(admin_from_row(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn update_student(
        &self,
        id: i64,
        name: &str,
        email: &str,
        plan: Plan,
    ) -> Result<Student, Error> {
        log::trace!(
            "Store::update_student( {}, {:?}, {:?}, {} ) called.",
            id, name, email, plan
        );

        let mut client = self.connect().await?;
        let t = client.transaction().await?;

        if email_in_use(&t, "students", email, id).await? {
            return Err(Error::DuplicateEmail(email.to_owned()));
        }

        let row = t.query_opt(
            "UPDATE students SET name = $1, email = $2, plan = $3
                WHERE id = $4 RETURNING *",
            &[&name, &email, &plan.to_string(), &id]
        ).await?.ok_or(Error::NotFound("student"))?;
        let s = student_from_row(&row)?;

        t.commit().await?;
        Ok(s)
    }

    /// A teacher's language and track are immutable classification; only
    /// name and email may change.
    pub async fn update_teacher(
        &self,
        id: i64,
        name: &str,
        email: &str,
    ) -> Result<Teacher, Error> {
        log::trace!(
            "Store::update_teacher( {}, {:?}, {:?} ) called.",
            id, name, email
        );

        let mut client = self.connect().await?;
        let t = client.transaction().await?;

        if email_in_use(&t, "teachers", email, id).await? {
            return Err(Error::DuplicateEmail(email.to_owned()));
        }

        let row = t.query_opt(
            "UPDATE teachers SET name = $1, email = $2
                WHERE id = $3 RETURNING *",
            &[&name, &email, &id]
        ).await?.ok_or(Error::NotFound("teacher"))?;
        let teacher = teacher_from_row(&row)?;

        t.commit().await?;
        Ok(teacher)
    }

    pub async fn update_admin(
        &self,
        id: i64,
        name: &str,
        email: &str,
    ) -> Result<Admin, Error> {
        log::trace!(
            "Store::update_admin( {}, {:?}, {:?} ) called.",
            id, name, email
        );

        let mut client = self.connect().await?;
        let t = client.transaction().await?;

        if email_in_use(&t, "admins", email, id).await? {
            return Err(Error::DuplicateEmail(email.to_owned()));
        }

        let row = t.query_opt(
            "UPDATE admins SET name = $1, email = $2
                WHERE id = $3 RETURNING *",
            &[&name, &email, &id]
        ).await?.ok_or(Error::NotFound("admin"))?;
        let a = admin_from_row(&row)?;

        t.commit().await?;
        Ok(a)
    }

    /// Deleting a student leaves any lessons they own in place with a
    /// dangling reference; listings substitute nulls for the lost details.
    pub async fn delete_student(&self, id: i64) -> Result<(), Error> {
        log::trace!("Store::delete_student( {} ) called.", id);

        let client = self.connect().await?;
        let n = client.execute(
            "DELETE FROM students WHERE id = $1", &[&id]
        ).await?;

        if n == 0 {
            Err(Error::NotFound("student"))
        } else {
            Ok(())
        }
    }

    pub async fn delete_teacher(&self, id: i64) -> Result<(), Error> {
        log::trace!("Store::delete_teacher( {} ) called.", id);

        let client = self.connect().await?;
        let n = client.execute(
            "DELETE FROM teachers WHERE id = $1", &[&id]
        ).await?;

        if n == 0 {
            Err(Error::NotFound("teacher"))
        } else {
            Ok(())
        }
    }

    /// The self-deletion check lives at the interface layer, where the
    /// caller's identity is known; by the time this runs the target is
    /// already known not to be the caller.
    pub async fn delete_admin(&self, id: i64) -> Result<(), Error> {
        log::trace!("Store::delete_admin( {} ) called.", id);

        let client = self.connect().await?;
        let n = client.execute(
            "DELETE FROM admins WHERE id = $1", &[&id]
        ).await?;

        if n == 0 {
            Err(Error::NotFound("admin"))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::tests::TEST_CONNECTION;
    use crate::tests::ensure_logging;

    use serial_test::serial;

    static TEACHERS: &[(&str, &str, Language, Track)] = &[
        ("Mr Berro", "berro@fluente.school", Language::English, Track::Finance),
        ("Ms Irfan", "irfan@fluente.school", Language::Spanish, Track::Corporate),
        ("Ms Jenny", "jenny@fluente.school", Language::English, Track::Corporate),
    ];

    #[tokio::test]
    #[ignore]
    #[serial]
    async fn directory_crud_cycle() {
        ensure_logging();

        let db = Store::new(TEST_CONNECTION.to_owned());
        db.ensure_db_schema().await.unwrap();

        for (name, email, language, track) in TEACHERS.iter() {
            db.insert_teacher(name, email, *language, *track).await.unwrap();
        }

        let teachers = db.get_teachers().await.unwrap();
        assert_eq!(teachers.len(), TEACHERS.len());
        // Directory order is id order.
        for w in teachers.windows(2) {
            assert!(w[0].id < w[1].id);
        }

        let s = db.insert_student(
            "John Smith", "jsmith@gmail.com", Plan::Individual
        ).await.unwrap();
        assert_eq!(
            db.get_student(s.id).await.unwrap().unwrap().plan,
            Plan::Individual
        );

        let s = db.update_student(
            s.id, "John Q. Smith", "jsmith@gmail.com", Plan::Group
        ).await.unwrap();
        assert_eq!(s.name, "John Q. Smith");
        assert_eq!(s.plan, Plan::Group);

        let t0 = &teachers[0];
        let updated = db.update_teacher(
            t0.id, "Mr Berro Sr.", "berro@fluente.school"
        ).await.unwrap();
        assert_eq!(updated.name, "Mr Berro Sr.");
        // Classification untouched.
        assert_eq!(updated.language, t0.language);
        assert_eq!(updated.track, t0.track);

        db.delete_student(s.id).await.unwrap();
        assert_eq!(
            db.delete_student(s.id).await.unwrap_err(),
            Error::NotFound("student")
        );
        assert!(db.get_student(s.id).await.unwrap().is_none());

        for teacher in teachers.iter() {
            db.delete_teacher(teacher.id).await.unwrap();
        }

        db.nuke_database().await.unwrap();
    }

    #[tokio::test]
    #[ignore]
    #[serial]
    async fn email_unique_per_role_namespace() {
        ensure_logging();

        let db = Store::new(TEST_CONNECTION.to_owned());
        db.ensure_db_schema().await.unwrap();

        let a = db.insert_admin("Thelma", "thelma@fluente.school").await.unwrap();
        assert_eq!(
            db.insert_admin("Other Thelma", "thelma@fluente.school")
                .await.unwrap_err(),
            Error::DuplicateEmail("thelma@fluente.school".to_owned())
        );

        // The same address under a different role is fine.
        let s = db.insert_student(
            "Thelma the Learner", "thelma@fluente.school", Plan::Group
        ).await.unwrap();

        // Updating onto someone else's address is a conflict too.
        let b = db.insert_admin("Dan", "dan@fluente.school").await.unwrap();
        assert_eq!(
            db.update_admin(b.id, "Dan", "thelma@fluente.school")
                .await.unwrap_err(),
            Error::DuplicateEmail("thelma@fluente.school".to_owned())
        );
        // Updating a record onto its own address is not.
        db.update_admin(a.id, "Thelma G.", "thelma@fluente.school")
            .await.unwrap();

        db.delete_student(s.id).await.unwrap();
        db.delete_admin(a.id).await.unwrap();
        db.delete_admin(b.id).await.unwrap();
        db.nuke_database().await.unwrap();
    }
}
